use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::config::{DurationSpec, GifConfig};
use crate::error::Result;
use crate::formats;
use crate::frame::Frame;
use crate::load::{load_frames, Decoder, ImageDecoder};
use crate::report::{Reporter, TracingReporter};
use crate::resize::{resize_frames, LanczosResampler, Resampler};
use crate::resolve::resolve_image_paths;
use crate::writer::{write_gif, EncodeOptions, Encoder, GifFileEncoder};

/// Turns a directory of images (or a single image) into an animated GIF.
///
/// Each call is a one-shot, blocking conversion; the converter keeps no
/// state between calls. The codec capabilities and the reporter are
/// injected so the pipeline can run against fakes.
pub struct Converter<
    D = ImageDecoder,
    R = LanczosResampler,
    E = GifFileEncoder,
    S = TracingReporter,
> {
    decoder: D,
    resampler: R,
    encoder: E,
    reporter: S,
}

impl Converter {
    /// Converter using the `image` crate for decoding, resizing and encoding.
    pub fn new() -> Self {
        Self::with_parts(ImageDecoder, LanczosResampler, GifFileEncoder, TracingReporter)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R, E, S> Converter<D, R, E, S>
where
    D: Decoder,
    R: Resampler,
    E: Encoder,
    S: Reporter,
{
    pub fn with_parts(decoder: D, resampler: R, encoder: E, reporter: S) -> Self {
        Self {
            decoder,
            resampler,
            encoder,
            reporter,
        }
    }

    /// Swap the reporter, e.g. for `SilentReporter`.
    pub fn with_reporter<S2: Reporter>(self, reporter: S2) -> Converter<D, R, E, S2> {
        Converter {
            decoder: self.decoder,
            resampler: self.resampler,
            encoder: self.encoder,
            reporter,
        }
    }

    /// Convert with a uniform or per-frame duration and a loop count
    /// (0 = infinite). No resizing is applied.
    pub fn convert(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        duration: impl Into<DurationSpec>,
        loop_count: u16,
    ) -> Result<()> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let duration = duration.into();
        info!(?input, ?output, ?duration, loop_count, "converting images to GIF");

        let frames = self.load(input)?;
        write_gif(
            &self.encoder,
            &frames,
            &duration,
            &EncodeOptions::looping(loop_count),
            output,
        )?;

        self.reporter.gif_created(output);
        Ok(())
    }

    /// Convert using a `GifConfig`, which additionally controls resizing,
    /// fps-derived timing and encoder hints.
    pub fn convert_with_config(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        config: &GifConfig,
    ) -> Result<()> {
        let (input, output) = (input.as_ref(), output.as_ref());
        config.validate()?;
        info!(?input, ?output, ?config, "converting images to GIF with config");

        let mut frames = self.load(input)?;
        if config.should_resize() {
            frames = resize_frames(&self.resampler, frames, config)?;
        }

        let options = EncodeOptions {
            loop_count: config.loop_count,
            optimize: config.optimize,
            quality: config.quality,
        };
        write_gif(
            &self.encoder,
            &frames,
            &config.frame_duration(),
            &options,
            output,
        )?;

        self.reporter.gif_created(output);
        Ok(())
    }

    /// The supported input extensions, as an independent copy.
    pub fn supported_formats(&self) -> BTreeSet<String> {
        formats::supported_formats()
    }

    fn load(&self, input: &Path) -> Result<Vec<Frame>> {
        let paths = resolve_image_paths(input)?;
        load_frames(&self.decoder, &paths)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::path::PathBuf;

    use image::{DynamicImage, RgbImage};
    use tempfile::{tempdir, TempDir};
    use tracing_test::traced_test;

    use super::*;
    use crate::error::{BoxError, Error};

    /// Decodes `WxH.png` style names into blank images of that size.
    #[derive(Default)]
    struct SizeFromNameDecoder {
        calls: Cell<usize>,
    }

    impl Decoder for SizeFromNameDecoder {
        fn decode(&self, path: &Path) -> std::result::Result<DynamicImage, BoxError> {
            self.calls.set(self.calls.get() + 1);
            let stem = path.file_stem().unwrap().to_string_lossy();
            let size = stem.rsplit('_').next().unwrap();
            let (w, h) = size.split_once('x').ok_or("no size in name")?;
            Ok(DynamicImage::ImageRgb8(RgbImage::new(w.parse()?, h.parse()?)))
        }
    }

    #[derive(Default)]
    struct FakeResampler {
        calls: Cell<usize>,
    }

    impl Resampler for FakeResampler {
        fn resample(&self, _image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
            self.calls.set(self.calls.get() + 1);
            DynamicImage::ImageRgb8(RgbImage::new(width, height))
        }
    }

    #[derive(Default)]
    struct CapturingEncoder {
        sizes: RefCell<Vec<(u32, u32)>>,
        delays: RefCell<Vec<u32>>,
        options: RefCell<Option<EncodeOptions>>,
    }

    impl Encoder for CapturingEncoder {
        fn encode(
            &self,
            frames: &[Frame],
            delays_ms: &[u32],
            options: &EncodeOptions,
            _dest: &Path,
        ) -> std::result::Result<(), BoxError> {
            *self.sizes.borrow_mut() = frames.iter().map(Frame::dimensions).collect();
            *self.delays.borrow_mut() = delays_ms.to_vec();
            *self.options.borrow_mut() = Some(*options);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CapturingReporter {
        created: RefCell<Vec<PathBuf>>,
    }

    impl Reporter for CapturingReporter {
        fn gif_created(&self, path: &Path) {
            self.created.borrow_mut().push(path.to_path_buf());
        }
    }

    type FakeConverter =
        Converter<SizeFromNameDecoder, FakeResampler, CapturingEncoder, CapturingReporter>;

    fn fake_converter() -> FakeConverter {
        Converter::with_parts(
            SizeFromNameDecoder::default(),
            FakeResampler::default(),
            CapturingEncoder::default(),
            CapturingReporter::default(),
        )
    }

    fn frames_dir(names: &[&str]) -> TempDir {
        let dir = tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    #[test]
    #[traced_test]
    fn convert_writes_uniform_delays_and_reports() {
        let dir = frames_dir(&["b_4x4.png", "a_4x4.png", "c_4x4.png"]);
        let out = dir.path().join("out.gif");
        let converter = fake_converter();

        converter.convert(dir.path(), &out, 0.5, 0).unwrap();

        assert_eq!(*converter.encoder.delays.borrow(), vec![500, 500, 500]);
        assert_eq!(converter.encoder.options.borrow().unwrap().loop_count, 0);
        assert_eq!(converter.resampler.calls.get(), 0);
        assert_eq!(*converter.reporter.created.borrow(), vec![out]);
    }

    #[test]
    fn missing_input_fails_before_decoding() {
        let dir = tempdir().unwrap();
        let converter = fake_converter();

        let err = converter
            .convert(dir.path().join("missing"), dir.path().join("out.gif"), 1.0, 0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(converter.decoder.calls.get(), 0);
        assert!(converter.reporter.created.borrow().is_empty());
    }

    #[test]
    fn empty_directory_is_no_images_found() {
        let dir = frames_dir(&["notes.txt"]);
        let converter = fake_converter();

        let err = converter
            .convert_with_config(dir.path(), dir.path().join("out.gif"), &GifConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::NoImagesFound(_)));
    }

    #[test]
    fn config_without_resize_keeps_source_size() {
        let dir = frames_dir(&["a_30x20.png", "b_30x20.png"]);
        let converter = fake_converter();
        let config = GifConfig::default().with_fps(10.0).with_loop_count(2);

        converter
            .convert_with_config(dir.path(), dir.path().join("out.gif"), &config)
            .unwrap();

        assert_eq!(converter.resampler.calls.get(), 0);
        assert_eq!(*converter.encoder.sizes.borrow(), vec![(30, 20), (30, 20)]);
        assert_eq!(*converter.encoder.delays.borrow(), vec![100, 100]);
        assert_eq!(converter.encoder.options.borrow().unwrap().loop_count, 2);
    }

    #[test]
    fn config_resize_uses_first_frame_for_every_frame() {
        let dir = frames_dir(&[
            "1_200x100.png",
            "2_100x100.png",
            "3_100x200.png",
            "4_300x300.png",
            "5_60x30.png",
        ]);
        let converter = fake_converter();
        let config = GifConfig::default().with_size(Some(100), None);

        converter
            .convert_with_config(dir.path(), dir.path().join("out.gif"), &config)
            .unwrap();

        assert_eq!(converter.resampler.calls.get(), 5);
        assert_eq!(*converter.encoder.sizes.borrow(), vec![(100, 50); 5]);
    }

    #[test]
    fn optimize_hints_reach_encoder() {
        let dir = frames_dir(&["a_8x8.png"]);
        let converter = fake_converter();
        let config = GifConfig::default().with_optimize(true, 100);

        converter
            .convert_with_config(dir.path(), dir.path().join("out.gif"), &config)
            .unwrap();

        let options = converter.encoder.options.borrow().unwrap();
        assert!(options.optimize);
        assert_eq!(options.quality, 100);
    }

    #[test]
    fn invalid_config_fails_before_touching_input() {
        let converter = fake_converter();
        let config = GifConfig::default().with_fps(-1.0);

        let err = converter
            .convert_with_config("/definitely/not/here", "/tmp/out.gif", &config)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn oversized_resize_is_rejected_without_writing() {
        let dir = frames_dir(&["a_8x8.png"]);
        let converter = fake_converter();
        let config = GifConfig::default().with_scale(1e10);

        let err = converter
            .convert_with_config(dir.path(), dir.path().join("out.gif"), &config)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(converter.resampler.calls.get(), 0);
        assert!(converter.encoder.sizes.borrow().is_empty());
    }

    #[test]
    fn per_frame_durations_must_match_frame_count() {
        let dir = frames_dir(&["a_4x4.png", "b_4x4.png"]);
        let converter = fake_converter();

        let err = converter
            .convert(dir.path(), dir.path().join("out.gif"), vec![0.1, 0.2, 0.3], 0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(converter.reporter.created.borrow().is_empty());
    }

    #[test]
    fn supported_formats_cannot_be_mutated() {
        let converter = Converter::new();
        let mut formats = converter.supported_formats();
        formats.clear();
        assert!(converter.supported_formats().contains(".webp"));
    }
}
