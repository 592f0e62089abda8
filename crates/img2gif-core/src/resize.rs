use image::imageops::FilterType;
use image::DynamicImage;
use tracing::{debug, info};

use crate::config::GifConfig;
use crate::error::Result;
use crate::frame::Frame;

/// Resamples an image to an exact size.
pub trait Resampler {
    fn resample(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage;
}

/// Lanczos (a = 3) resampling through `image::imageops`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LanczosResampler;

impl Resampler for LanczosResampler {
    fn resample(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        image.resize_exact(width, height, FilterType::Lanczos3)
    }
}

/// Resize every frame to the single target size derived from the first
/// frame, so that all output frames share the same dimensions.
pub fn resize_frames(
    resampler: &dyn Resampler,
    frames: Vec<Frame>,
    config: &GifConfig,
) -> Result<Vec<Frame>> {
    if frames.is_empty() {
        return Ok(frames);
    }

    let (source_w, source_h) = frames[0].dimensions();
    let (width, height) = config.target_size(source_w, source_h)?;
    info!(source_w, source_h, width, height, "resizing frames");

    frames
        .iter()
        .map(|frame| {
            debug!(
                index = frame.index(),
                from_w = frame.width(),
                from_h = frame.height(),
                "resampling frame"
            );
            frame.with_image(resampler.resample(frame.image(), width, height))
        })
        .collect()
}
