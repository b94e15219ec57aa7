//! Fixed style presets and aspect-ratio descriptions offered to the user.

use crate::models::AspectRatio;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    pub id: &'static str,
    pub label: &'static str,
    /// Appended verbatim to the user's prompt.
    pub prompt_modifier: &'static str,
}

pub const DEFAULT_STYLE_ID: &str = "social-aesthetic";

pub const STYLE_PRESETS: &[StylePreset] = &[
    StylePreset {
        id: "none",
        label: "Natural / No Filter",
        prompt_modifier: "",
    },
    StylePreset {
        id: "social-aesthetic",
        label: "Insta Aesthetic",
        prompt_modifier: ", trending on social media, aesthetic, soft lighting, high quality, consistent color palette, influencer style, canon 5d, 50mm lens",
    },
    StylePreset {
        id: "photorealistic",
        label: "Photorealistic",
        prompt_modifier: ", highly detailed, photorealistic, 8k resolution, cinematic lighting, professional photography, sharp focus, depth of field",
    },
    StylePreset {
        id: "studio-product",
        label: "Studio Product",
        prompt_modifier: ", professional studio lighting, clean background, product photography, commercial quality, 4k, advertising standard",
    },
    StylePreset {
        id: "cinematic",
        label: "Cinematic Movie",
        prompt_modifier: ", cinematic shot, movie scene, color graded, teal and orange, dramatic lighting, imax quality",
    },
    StylePreset {
        id: "anime",
        label: "Anime / Manga",
        prompt_modifier: ", anime style, studio ghibli style, vibrant colors, detailed line art, character design, 2d animation",
    },
    StylePreset {
        id: "3d-render",
        label: "3D Render",
        prompt_modifier: ", 3d render, unreal engine 5, octane render, ray tracing, volumetric lighting, hyperdetailed, cgi",
    },
    StylePreset {
        id: "cyberpunk",
        label: "Cyberpunk",
        prompt_modifier: ", cyberpunk, neon lights, futuristic, high contrast, sci-fi, night time, blade runner style",
    },
    StylePreset {
        id: "minimalist",
        label: "Minimalist",
        prompt_modifier: ", minimalist, flat design, vector art, clean lines, simple background, modern, less is more",
    },
];

/// Look up a preset by id.
pub fn find_style(id: &str) -> Option<&'static StylePreset> {
    STYLE_PRESETS.iter().find(|preset| preset.id == id)
}

/// Modifier for a preset id; unknown ids contribute nothing.
pub fn style_modifier(id: &str) -> &'static str {
    find_style(id).map(|preset| preset.prompt_modifier).unwrap_or("")
}

pub fn aspect_ratio_label(ratio: AspectRatio) -> &'static str {
    match ratio {
        AspectRatio::Square => "Square",
        AspectRatio::Portrait4x5 => "IG Portrait",
        AspectRatio::Portrait9x16 => "Story/Reel",
        AspectRatio::Landscape16x9 => "Landscape",
        AspectRatio::Landscape4x3 => "Standard",
        AspectRatio::Portrait3x4 => "Vertical",
    }
}

pub fn aspect_ratio_description(ratio: AspectRatio) -> &'static str {
    match ratio {
        AspectRatio::Square => "IG Feed, Profile Pics",
        AspectRatio::Portrait4x5 => "Instagram Feed (Best Reach)",
        AspectRatio::Portrait9x16 => "TikTok, Reels, Stories",
        AspectRatio::Landscape16x9 => "YouTube, Twitter, Facebook",
        AspectRatio::Landscape4x3 => "Blog Posts, Web Gallery",
        AspectRatio::Portrait3x4 => "Pinterest, Editorial",
    }
}
