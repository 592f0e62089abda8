use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::Delay;
use tracing::{debug, error, info};

use crate::config::{DurationSpec, DEFAULT_QUALITY, LOOP_FOREVER};
use crate::error::{BoxError, Error, Result};
use crate::frame::Frame;

/// Quantizer speed used when no optimization is requested.
const DEFAULT_SPEED: i32 = 10;
const FASTEST_SPEED: i32 = 30;

/// Encoder knobs passed through untouched from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// 0 = loop forever.
    pub loop_count: u16,
    pub optimize: bool,
    /// 1..=100, higher is better.
    pub quality: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            loop_count: LOOP_FOREVER,
            optimize: false,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl EncodeOptions {
    pub fn looping(loop_count: u16) -> Self {
        Self {
            loop_count,
            ..Self::default()
        }
    }

    /// NeuQuant speed (1 = best palette, 30 = fastest).
    pub fn speed(&self) -> i32 {
        if !self.optimize {
            return DEFAULT_SPEED;
        }
        let quality = i32::from(self.quality.clamp(1, 100));
        FASTEST_SPEED - (quality - 1) * (FASTEST_SPEED - 1) / 99
    }

    fn repeat(&self) -> Repeat {
        match self.loop_count {
            LOOP_FOREVER => Repeat::Infinite,
            n => Repeat::Finite(n),
        }
    }
}

/// Serializes frames into an animated image file.
pub trait Encoder {
    fn encode(
        &self,
        frames: &[Frame],
        delays_ms: &[u32],
        options: &EncodeOptions,
        dest: &Path,
    ) -> std::result::Result<(), BoxError>;
}

/// GIF encoder backed by `image::codecs::gif`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GifFileEncoder;

impl Encoder for GifFileEncoder {
    fn encode(
        &self,
        frames: &[Frame],
        delays_ms: &[u32],
        options: &EncodeOptions,
        dest: &Path,
    ) -> std::result::Result<(), BoxError> {
        let Some(first) = frames.first() else {
            return Err("no frames to encode".into());
        };
        if let Some(odd) = frames.iter().find(|f| f.dimensions() != first.dimensions()) {
            return Err(format!(
                "inconsistent frame dimensions: frame #1 is {}x{}, frame #{} is {}x{}",
                first.width(),
                first.height(),
                odd.index() + 1,
                odd.width(),
                odd.height()
            )
            .into());
        }
        if delays_ms.len() != frames.len() {
            return Err(format!(
                "{} delays for {} frames",
                delays_ms.len(),
                frames.len()
            )
            .into());
        }

        // The trailer is written when the encoder drops, so encode to memory
        // and write the file in one checked step.
        let mut buf = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut buf, options.speed());
            encoder.set_repeat(options.repeat())?;

            for (frame, &ms) in frames.iter().zip(delays_ms) {
                let delay = Delay::from_numer_denom_ms(ms, 1);
                let rgba = frame.image().to_rgba8();
                encoder.encode_frame(image::Frame::from_parts(rgba, 0, 0, delay))?;
                debug!(index = frame.index(), delay_ms = ms, "encoded frame");
            }
        }

        std::fs::write(dest, &buf)
            .map_err(|e| format!("failed to write {}: {e}", dest.display()))?;
        debug!(?dest, bytes = buf.len(), "GIF written");
        Ok(())
    }
}

/// Write `frames` as a GIF at `dest`, creating parent directories.
///
/// Encoder and I/O failures are reported as `Error::Conversion`.
pub fn write_gif(
    encoder: &dyn Encoder,
    frames: &[Frame],
    duration: &DurationSpec,
    options: &EncodeOptions,
    dest: &Path,
) -> Result<()> {
    if frames.is_empty() {
        return Err(Error::Conversion("no frames to encode".into()));
    }
    let delays_ms = duration.to_millis(frames.len())?;

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::Conversion(format!(
                "failed to create output directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    info!(
        ?dest,
        frame_count = frames.len(),
        loop_count = options.loop_count,
        speed = options.speed(),
        "writing GIF"
    );

    encoder
        .encode(frames, &delays_ms, options, dest)
        .map_err(|e| {
            error!(?dest, error = %e, "GIF encoding failed");
            Error::Conversion(e.to_string())
        })
}
