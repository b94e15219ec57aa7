use anyhow::{bail, Result};
use banana_canvas::app::App;
use banana_canvas::export;
use banana_canvas::gallery::Gallery;
use banana_canvas::models::{
    AspectRatio, Config, GenerationOutcome, GenerationRequest, MAX_BATCH_SIZE,
};
use banana_canvas::presets::{self, DEFAULT_STYLE_ID, STYLE_PRESETS};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "banana-canvas")]
#[command(about = "Generate social media image variations with Gemini")]
struct CliArgs {
    /// What to draw.
    #[arg(
        value_name = "PROMPT",
        required_unless_present_any = ["list_styles", "list_aspect_ratios"]
    )]
    prompt: Option<String>,

    /// Style preset id (see --list-styles).
    #[arg(long, default_value = DEFAULT_STYLE_ID, value_parser = parse_style_arg)]
    style: String,

    /// Canvas aspect ratio, e.g. 1:1 or 9:16.
    #[arg(long, default_value = "1:1", value_parser = parse_aspect_ratio_arg)]
    aspect_ratio: AspectRatio,

    /// Number of variations to request, 1 to 16 (defaults to BATCH_SIZE or 4).
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=MAX_BATCH_SIZE as i64))]
    count: Option<u16>,

    /// Directory to save images into (defaults to OUTPUT_DIR or ./output).
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    list_styles: bool,

    #[arg(long)]
    list_aspect_ratios: bool,
}

fn parse_style_arg(input: &str) -> std::result::Result<String, String> {
    presets::find_style(input)
        .map(|preset| preset.id.to_string())
        .ok_or_else(|| {
            let ids: Vec<&str> = STYLE_PRESETS.iter().map(|p| p.id).collect();
            format!("Unknown style '{}'. Expected one of: {}", input, ids.join(", "))
        })
}

fn parse_aspect_ratio_arg(input: &str) -> std::result::Result<AspectRatio, String> {
    input.parse().map_err(|e: banana_canvas::Error| e.to_string())
}

fn print_styles() {
    for preset in STYLE_PRESETS {
        println!("{:<18} {}", preset.id, preset.label);
    }
}

fn print_aspect_ratios() {
    for ratio in AspectRatio::ALL {
        println!(
            "{:<6} {:<12} {}",
            ratio.as_str(),
            presets::aspect_ratio_label(ratio),
            presets::aspect_ratio_description(ratio)
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banana_canvas=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    if args.list_styles || args.list_aspect_ratios {
        if args.list_styles {
            print_styles();
        }
        if args.list_aspect_ratios {
            print_aspect_ratios();
        }
        return Ok(());
    }

    let Some(prompt) = args.prompt else {
        bail!("A prompt is required");
    };

    let config = Config::from_env()?;
    let count = args.count.map(usize::from).unwrap_or(config.batch_size);
    let output_dir = args.output.unwrap_or_else(|| config.output_dir.clone());

    info!("Starting banana-canvas");
    let app = App::from_config(&config);
    let gallery = Gallery::new();

    let request = GenerationRequest::new(prompt, args.aspect_ratio, count)
        .with_style_modifier(presets::style_modifier(&args.style));

    match app.generate_with_reselect(&gallery, &request).await {
        GenerationOutcome::Success(_) => {
            let state = gallery.snapshot().await;
            println!("Generated {} variations", state.images.len());
            for path in export::download_all(&state.images, &output_dir).await? {
                println!("{}", path.display());
            }
            Ok(())
        }
        outcome => {
            let message = outcome.user_message().unwrap_or("Generation failed.");
            error!("{}", message);
            eprintln!("{}", message);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_arg_valid() {
        assert_eq!(parse_style_arg("cyberpunk").unwrap(), "cyberpunk");
    }

    #[test]
    fn test_parse_style_arg_invalid() {
        let err = parse_style_arg("vaporwave").unwrap_err();
        assert!(err.contains("social-aesthetic"));
    }

    #[test]
    fn test_parse_aspect_ratio_arg() {
        assert_eq!(
            parse_aspect_ratio_arg("16:9").unwrap(),
            AspectRatio::Landscape16x9
        );
        assert!(parse_aspect_ratio_arg("21:9").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::try_parse_from(["banana-canvas", "a red bicycle"]).unwrap();
        assert_eq!(args.prompt.as_deref(), Some("a red bicycle"));
        assert_eq!(args.style, DEFAULT_STYLE_ID);
        assert_eq!(args.aspect_ratio, AspectRatio::Square);
        assert!(args.count.is_none());
    }

    #[test]
    fn test_cli_list_without_prompt() {
        let args = CliArgs::try_parse_from(["banana-canvas", "--list-styles"]).unwrap();
        assert!(args.list_styles);
        assert!(args.prompt.is_none());
    }

    #[test]
    fn test_cli_requires_prompt() {
        assert!(CliArgs::try_parse_from(["banana-canvas"]).is_err());
    }

    #[test]
    fn test_cli_count_bounds() {
        let args = CliArgs::try_parse_from(["banana-canvas", "cat", "--count", "16"]).unwrap();
        assert_eq!(args.count, Some(16));

        for count in ["0", "17", "100000"] {
            assert!(
                CliArgs::try_parse_from(["banana-canvas", "cat", "--count", count]).is_err(),
                "--count {count}"
            );
        }
    }
}
