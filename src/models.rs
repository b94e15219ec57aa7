//! Data models and structures
//!
//! Defines the request/result types that flow between the CLI, the batch
//! orchestrator and the gallery, plus environment-driven configuration.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "4:5")]
    Portrait4x5,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 6] = [
        Self::Square,
        Self::Portrait4x5,
        Self::Portrait9x16,
        Self::Landscape16x9,
        Self::Landscape4x3,
        Self::Portrait3x4,
    ];

    /// The `W:H` string the image API expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait3x4 => "3:4",
            Self::Landscape4x3 => "4:3",
            Self::Portrait9x16 => "9:16",
            Self::Landscape16x9 => "16:9",
            Self::Portrait4x5 => "4:5",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|ratio| ratio.as_str() == s.trim())
            .ok_or_else(|| {
                Error::InvalidRequest(format!(
                    "Unsupported aspect ratio '{}'. Expected one of: {}",
                    s,
                    Self::ALL.map(|r| r.as_str()).join(", ")
                ))
            })
    }
}

/// One user action's worth of generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub style_modifier: String,
    pub aspect_ratio: AspectRatio,
    pub count: usize,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, aspect_ratio: AspectRatio, count: usize) -> Self {
        Self {
            prompt: prompt.into(),
            style_modifier: String::new(),
            aspect_ratio,
            count,
        }
    }

    pub fn with_style_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.style_modifier = modifier.into();
        self
    }
}

/// Image bytes as returned by the provider, with their declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Self-contained `data:` URL for the image.
    pub fn data_url(&self) -> String {
        use base64::Engine as _;
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}

/// A successfully generated image as shown in the gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub id: Uuid,
    pub image: EncodedImage,
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub created_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(image: EncodedImage, prompt: String, aspect_ratio: AspectRatio) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            prompt,
            aspect_ratio,
            created_at: Utc::now(),
        }
    }
}

/// The single aggregate result of one generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Success(Vec<GenerationResult>),
    NoResults,
    AuthError,
    /// The prompt was blank; nothing was attempted.
    EmptyPrompt,
    GenericError(String),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Message shown to the user, `None` on success.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Success(_) => None,
            Self::NoResults => Some("No images were generated. Please try again."),
            Self::AuthError => Some("Authentication lost. Please select your API key."),
            Self::EmptyPrompt => Some("Please enter a prompt to generate images."),
            Self::GenericError(_) => Some(
                "Failed to generate images. The model might be busy or the prompt triggered safety filters.",
            ),
        }
    }
}

// Configuration
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_IMAGE_SIZE: &str = "1K";
pub const DEFAULT_BATCH_SIZE: usize = 4;
/// Upper bound on concurrent calls in one batch.
pub const MAX_BATCH_SIZE: usize = 16;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment-time key; `None` means fall back to interactive selection.
    pub api_key: Option<String>,
    pub image_model: String,
    pub image_size: String,
    pub base_url: Option<String>,
    pub request_timeout: Duration,
    pub batch_size: usize,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            base_url: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let request_timeout = match non_empty("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|_| {
                Error::Config(format!("REQUEST_TIMEOUT_SECS must be an integer, got '{}'", raw))
            })?),
            None => defaults.request_timeout,
        };

        let batch_size = match non_empty("BATCH_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| (1..=MAX_BATCH_SIZE).contains(size))
                .ok_or_else(|| {
                    Error::Config(format!(
                        "BATCH_SIZE must be an integer between 1 and {}, got '{}'",
                        MAX_BATCH_SIZE, raw
                    ))
                })?,
            None => defaults.batch_size,
        };

        Ok(Self {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            image_model: non_empty("GEMINI_IMAGE_MODEL").unwrap_or(defaults.image_model),
            image_size: non_empty("GEMINI_IMAGE_SIZE").unwrap_or(defaults.image_size),
            base_url: non_empty("GEMINI_BASE_URL"),
            request_timeout,
            batch_size,
            output_dir: non_empty("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_aspect_ratio_serialization() {
        let json = serde_json::to_string(&AspectRatio::Landscape16x9).unwrap();
        assert_eq!(json, "\"16:9\"");

        let parsed: AspectRatio = serde_json::from_str("\"4:5\"").unwrap();
        assert_eq!(parsed, AspectRatio::Portrait4x5);
    }

    #[test]
    fn test_aspect_ratio_from_str() {
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait9x16);
        assert_eq!(" 1:1 ".parse::<AspectRatio>().unwrap(), AspectRatio::Square);

        let err = "2:1".parse::<AspectRatio>().unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(err.to_string().contains("16:9"));
    }

    #[test]
    fn test_data_url() {
        let image = EncodedImage::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(image.data_url(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_generation_results_get_unique_ids() {
        let image = EncodedImage::new("image/png", vec![1]);
        let a = GenerationResult::new(image.clone(), "cat".into(), AspectRatio::Square);
        let b = GenerationResult::new(image, "cat".into(), AspectRatio::Square);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_outcome_messages() {
        assert!(GenerationOutcome::Success(Vec::new()).user_message().is_none());
        assert!(GenerationOutcome::AuthError
            .user_message()
            .unwrap()
            .contains("API key"));
        assert_ne!(
            GenerationOutcome::NoResults.user_message(),
            GenerationOutcome::AuthError.user_message()
        );

        let blank = GenerationOutcome::EmptyPrompt.user_message().unwrap();
        assert!(blank.contains("prompt"));
        assert!(!blank.contains("safety filters"));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.image_size, "1K");
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_config_prefers_gemini_key_and_ignores_blank() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "  "),
            ("API_KEY", "fallback-key"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("fallback-key"));

        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "primary"),
            ("API_KEY", "fallback-key"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_config_rejects_bad_numbers() {
        let err = Config::from_lookup(lookup_from(&[("BATCH_SIZE", "four")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err =
            Config::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_batch_size_bounds() {
        let config = Config::from_lookup(lookup_from(&[("BATCH_SIZE", "16")])).unwrap();
        assert_eq!(config.batch_size, MAX_BATCH_SIZE);

        for raw in ["0", "17", "100000"] {
            let err = Config::from_lookup(lookup_from(&[("BATCH_SIZE", raw)])).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "BATCH_SIZE={raw}");
        }
    }
}
