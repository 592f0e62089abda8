mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use img2gif_core::fixtures::FixtureGenerator;
use img2gif_core::{Converter, DurationSpec, GifConfig};

use cli::ConvertArgs;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Convert(args) => convert(args),
        cli::Command::Fixtures { output, font } => {
            info!(?output, ?font, "generating fixtures");

            let generator = match &font {
                Some(path) => FixtureGenerator::with_font_file(path),
                None => FixtureGenerator::new(None),
            };
            let generated = generator
                .generate_all(&output)
                .context("failed to generate fixtures")?;

            info!(
                basic_sequence = generated.basic_sequence.len(),
                formats = generated.formats.len(),
                sizes = generated.sizes.len(),
                single = ?generated.single,
                "fixtures generated"
            );
            Ok(())
        }
        cli::Command::Formats => {
            for ext in img2gif_core::supported_formats() {
                println!("{ext}");
            }
            Ok(())
        }
    }
}

fn convert(args: ConvertArgs) -> Result<()> {
    let converter = Converter::new();
    let duration = match args.durations.clone() {
        Some(list) => DurationSpec::PerFrame(list),
        None => DurationSpec::Uniform(args.duration),
    };

    if !args.needs_config() {
        return converter
            .convert(&args.input, &args.output, duration, args.loop_count)
            .with_context(|| format!("failed to convert {}", args.input.display()));
    }

    let config = GifConfig {
        width: args.width,
        height: args.height,
        scale: args.scale,
        max_dimension: args.max_dimension,
        maintain_aspect_ratio: !args.no_keep_aspect,
        fps: args.fps,
        duration,
        loop_count: args.loop_count,
        optimize: args.optimize,
        quality: args.quality,
    };
    converter
        .convert_with_config(&args.input, &args.output, &config)
        .with_context(|| format!("failed to convert {}", args.input.display()))
}
