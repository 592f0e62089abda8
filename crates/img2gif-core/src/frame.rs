use image::{DynamicImage, GenericImageView};

use crate::error::{Error, Result};

/// A single decoded image destined to become one GIF frame.
#[derive(Debug, Clone)]
pub struct Frame {
    image: DynamicImage,
    index: usize,
}

impl Frame {
    /// Wrap a decoded image. Zero-area images are rejected.
    pub fn new(image: DynamicImage, index: usize) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "frame #{} has empty dimensions {width}x{height}",
                index + 1
            )));
        }
        Ok(Self { image, index })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Samples per pixel (1 = luma, 2 = luma+alpha, 3 = RGB, 4 = RGBA).
    pub fn channels(&self) -> u8 {
        self.image.color().channel_count()
    }

    /// Position of the frame in its sequence (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Replace the pixel data, keeping the sequence position.
    pub fn with_image(&self, image: DynamicImage) -> Result<Self> {
        Self::new(image, self.index)
    }
}
