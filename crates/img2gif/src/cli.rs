use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "img2gif", about = "Turn a sequence of images into an animated GIF")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert an image file or a directory of images to a GIF.
    Convert(ConvertArgs),

    /// Generate synthetic sample images for testing.
    Fixtures {
        /// Directory to write the fixture sets into.
        #[arg(short, long)]
        output: PathBuf,

        /// TrueType/OpenType font for the text labels. Defaults to the bundled DejaVu Sans Mono.
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// List the supported input extensions.
    Formats,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Image file or directory of images (top level only, sorted by name).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path of the GIF to write. Parent directories are created.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Seconds per frame.
    #[arg(short, long, default_value_t = 1.0, conflicts_with = "durations")]
    pub duration: f64,

    /// Comma-separated seconds for each frame, one entry per frame.
    #[arg(long, value_delimiter = ',')]
    pub durations: Option<Vec<f64>>,

    /// Frames per second; overrides --duration.
    #[arg(long)]
    pub fps: Option<f64>,

    /// Number of loops, 0 = forever.
    #[arg(short, long = "loop", default_value_t = 0)]
    pub loop_count: u16,

    /// Target width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Scale factor applied to both dimensions.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Shrink so the longer side is at most this many pixels.
    #[arg(long)]
    pub max_dimension: Option<u32>,

    /// Keep the other side unchanged when only --width or --height is given.
    #[arg(long)]
    pub no_keep_aspect: bool,

    /// Spend more effort on the palette.
    #[arg(long)]
    pub optimize: bool,

    /// Palette quality (1-100), used with --optimize.
    #[arg(long, default_value_t = img2gif_core::config::DEFAULT_QUALITY)]
    pub quality: u8,
}

impl ConvertArgs {
    /// Whether anything beyond duration and loop count was requested.
    pub fn needs_config(&self) -> bool {
        self.fps.is_some()
            || self.width.is_some()
            || self.height.is_some()
            || self.scale.is_some()
            || self.max_dimension.is_some()
            || self.no_keep_aspect
            || self.optimize
    }
}
