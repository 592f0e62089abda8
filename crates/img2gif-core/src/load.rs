use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use tracing::{debug, error, info};

use crate::error::{BoxError, Error, Result};
use crate::frame::Frame;

/// Reads an image file into pixels.
pub trait Decoder {
    fn decode(&self, path: &Path) -> std::result::Result<DynamicImage, BoxError>;
}

/// Decodes any raster format enabled in the `image` crate, sniffing the
/// content rather than trusting the extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl Decoder for ImageDecoder {
    fn decode(&self, path: &Path) -> std::result::Result<DynamicImage, BoxError> {
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(image)
    }
}

/// Decode every path in order. The first failure aborts the whole load.
pub fn load_frames(decoder: &dyn Decoder, paths: &[PathBuf]) -> Result<Vec<Frame>> {
    let mut frames = Vec::with_capacity(paths.len());

    for (index, path) in paths.iter().enumerate() {
        let fail = |reason: String| {
            error!(?path, position = index + 1, %reason, "failed to load image");
            Error::ImageLoad {
                path: path.clone(),
                position: index + 1,
                reason,
            }
        };

        let image = decoder.decode(path).map_err(|e| fail(e.to_string()))?;
        let frame = Frame::new(image, index).map_err(|e| fail(e.to_string()))?;

        debug!(
            ?path,
            width = frame.width(),
            height = frame.height(),
            channels = frame.channels(),
            "loaded frame"
        );
        frames.push(frame);
    }

    info!(frame_count = frames.len(), "images loaded");
    Ok(frames)
}
