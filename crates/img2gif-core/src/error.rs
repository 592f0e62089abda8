use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the conversion pipeline. Each stage fails with its own
/// kind so callers can tell "nothing to convert" apart from "disk full".
#[derive(Error, Debug)]
pub enum Error {
    /// The input path is missing, has an unsupported extension, or is
    /// neither a file nor a directory.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The input was scanned but contained no supported images.
    #[error("no valid images found in: {}", .0.display())]
    NoImagesFound(PathBuf),

    /// Decoding a single source file failed.
    #[error("failed to load image {} (#{position}): {reason}", path.display())]
    ImageLoad {
        path: PathBuf,
        /// 1-based position of the file in the resolved sequence.
        position: usize,
        reason: String,
    },

    /// Encoding or writing the GIF failed.
    #[error("failed to create GIF: {0}")]
    Conversion(String),

    /// The conversion configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by the pluggable codec capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
