use crate::error::{Error, Result};

/// Seconds per frame used when neither fps nor a duration is given.
pub const DEFAULT_DURATION_SECS: f64 = 1.0;
/// Loop count meaning "repeat forever".
pub const LOOP_FOREVER: u16 = 0;
/// Quality hint used when the caller does not pick one.
pub const DEFAULT_QUALITY: u8 = 85;
/// Largest side a GIF logical screen can describe.
pub const MAX_GIF_DIMENSION: u32 = u16::MAX as u32;

/// Display time of each frame, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationSpec {
    /// The same duration for every frame.
    Uniform(f64),
    /// One duration per frame. The list length must match the frame count.
    PerFrame(Vec<f64>),
}

impl Default for DurationSpec {
    fn default() -> Self {
        DurationSpec::Uniform(DEFAULT_DURATION_SECS)
    }
}

impl From<f64> for DurationSpec {
    fn from(seconds: f64) -> Self {
        DurationSpec::Uniform(seconds)
    }
}

impl From<Vec<f64>> for DurationSpec {
    fn from(seconds: Vec<f64>) -> Self {
        DurationSpec::PerFrame(seconds)
    }
}

impl DurationSpec {
    /// Expand to one millisecond delay per frame.
    ///
    /// A per-frame list whose length differs from `frame_count` is rejected
    /// rather than truncated or cycled.
    pub fn to_millis(&self, frame_count: usize) -> Result<Vec<u32>> {
        match self {
            DurationSpec::Uniform(secs) => {
                let ms = seconds_to_millis(*secs)?;
                Ok(vec![ms; frame_count])
            }
            DurationSpec::PerFrame(list) => {
                if list.len() != frame_count {
                    return Err(Error::InvalidConfig(format!(
                        "{} durations given for {frame_count} frames",
                        list.len()
                    )));
                }
                list.iter().map(|secs| seconds_to_millis(*secs)).collect()
            }
        }
    }
}

fn seconds_to_millis(secs: f64) -> Result<u32> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(Error::InvalidConfig(format!(
            "frame duration must be a non-negative number of seconds, got {secs}"
        )));
    }
    let ms = (secs * 1000.0).round();
    if ms > u32::MAX as f64 {
        return Err(Error::InvalidConfig(format!("frame duration too long: {secs}s")));
    }
    Ok(ms as u32)
}

/// Settings for a configuration-driven conversion.
///
/// Resize precedence: absolute `width`/`height` first, then `scale`, then
/// `max_dimension`. When both `fps` and `duration` are present, `fps` wins.
#[derive(Debug, Clone, PartialEq)]
pub struct GifConfig {
    /// Target width in pixels.
    pub width: Option<u32>,
    /// Target height in pixels.
    pub height: Option<u32>,
    /// Factor applied to both dimensions.
    pub scale: Option<f64>,
    /// Upper bound for the longer side. Never upscales.
    pub max_dimension: Option<u32>,
    /// Derive the missing dimension from the source ratio when only one of
    /// `width`/`height` is set.
    pub maintain_aspect_ratio: bool,
    /// Frames per second; overrides `duration` when set.
    pub fps: Option<f64>,
    pub duration: DurationSpec,
    /// Number of repetitions, 0 = infinite.
    pub loop_count: u16,
    /// Ask the encoder to spend more effort on the palette.
    pub optimize: bool,
    /// Palette quality hint in 1..=100, only honored with `optimize`.
    pub quality: u8,
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale: None,
            max_dimension: None,
            maintain_aspect_ratio: true,
            fps: None,
            duration: DurationSpec::default(),
            loop_count: LOOP_FOREVER,
            optimize: false,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl GifConfig {
    pub fn with_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = Some(max_dimension);
        self
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    pub fn with_duration(mut self, duration: impl Into<DurationSpec>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_loop_count(mut self, loop_count: u16) -> Self {
        self.loop_count = loop_count;
        self
    }

    pub fn with_optimize(mut self, optimize: bool, quality: u8) -> Self {
        self.optimize = optimize;
        self.quality = quality;
        self
    }

    /// Check value ranges. Per-frame duration length is checked at write
    /// time, once the frame count is known.
    pub fn validate(&self) -> Result<()> {
        if let Some(fps) = self.fps {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(Error::InvalidConfig(format!("fps must be positive, got {fps}")));
            }
        }
        if let Some(scale) = self.scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "scale must be positive, got {scale}"
                )));
            }
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(Error::InvalidConfig("width and height must be at least 1".into()));
        }
        if self.max_dimension == Some(0) {
            return Err(Error::InvalidConfig("max_dimension must be at least 1".into()));
        }
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("max_dimension", self.max_dimension),
        ] {
            if let Some(value) = value.filter(|v| *v > MAX_GIF_DIMENSION) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be at most {MAX_GIF_DIMENSION}, got {value}"
                )));
            }
        }
        if !(1..=100).contains(&self.quality) {
            return Err(Error::InvalidConfig(format!(
                "quality must be in 1..=100, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Whether any resize rule is configured.
    pub fn should_resize(&self) -> bool {
        self.width.is_some()
            || self.height.is_some()
            || self.scale.is_some()
            || self.max_dimension.is_some()
    }

    /// Effective per-frame duration; `fps` takes precedence over `duration`.
    pub fn frame_duration(&self) -> DurationSpec {
        match self.fps {
            Some(fps) => DurationSpec::Uniform(1.0 / fps),
            None => self.duration.clone(),
        }
    }

    /// Target size for a source of `width` x `height`. Fails when a side
    /// would exceed what a GIF can hold.
    pub fn target_size(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        let (w, h) = (width as f64, height as f64);
        let keep = self.maintain_aspect_ratio;

        let (tw, th) = match (self.width, self.height) {
            (Some(tw), Some(th)) => (tw as f64, th as f64),
            (Some(tw), None) if keep => (tw as f64, h * tw as f64 / w),
            (Some(tw), None) => (tw as f64, h),
            (None, Some(th)) if keep => (w * th as f64 / h, th as f64),
            (None, Some(th)) => (w, th as f64),
            (None, None) => {
                if let Some(scale) = self.scale {
                    (w * scale, h * scale)
                } else if let Some(max) = self.max_dimension {
                    let longest = w.max(h);
                    if longest > max as f64 {
                        let ratio = max as f64 / longest;
                        (w * ratio, h * ratio)
                    } else {
                        (w, h)
                    }
                } else {
                    (w, h)
                }
            }
        };

        Ok((to_dimension(tw)?, to_dimension(th)?))
    }
}

fn to_dimension(value: f64) -> Result<u32> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded > MAX_GIF_DIMENSION as f64 {
        return Err(Error::InvalidConfig(format!(
            "resize target of {value} pixels exceeds the GIF limit of {MAX_GIF_DIMENSION}"
        )));
    }
    Ok((rounded as u32).max(1))
}
