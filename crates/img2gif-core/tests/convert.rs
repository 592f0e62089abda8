use std::fs::File;
use std::path::Path;

use img2gif_core::fixtures::FixtureGenerator;
use img2gif_core::report::SilentReporter;
use img2gif_core::{Converter, DurationSpec, Error, GifConfig};
use tempfile::tempdir;

/// What the `gif` crate reads back from an encoded file.
struct DecodedGif {
    frame_sizes: Vec<(u16, u16)>,
    /// Per-frame delays in centiseconds.
    delays: Vec<u16>,
    repeat: gif::Repeat,
}

fn decode_gif(path: &Path) -> DecodedGif {
    let file = File::open(path)
        .unwrap_or_else(|e| panic!("failed to open {}: {}", path.display(), e));
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(file).unwrap();

    let mut frame_sizes = Vec::new();
    let mut delays = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        frame_sizes.push((frame.width, frame.height));
        delays.push(frame.delay);
    }

    DecodedGif {
        frame_sizes,
        delays,
        repeat: decoder.repeat(),
    }
}

fn converter() -> Converter<
    img2gif_core::load::ImageDecoder,
    img2gif_core::resize::LanczosResampler,
    img2gif_core::writer::GifFileEncoder,
    SilentReporter,
> {
    Converter::new().with_reporter(SilentReporter)
}

#[test]
fn three_solid_frames_round_trip() {
    let dir = tempdir().unwrap();
    let frames = dir.path().join("frames");
    FixtureGenerator::new(None)
        .basic_sequence(&frames, 3, (200, 200), "frame")
        .unwrap();
    let out = dir.path().join("out.gif");

    converter().convert(&frames, &out, 0.5, 0).unwrap();

    let gif = decode_gif(&out);
    assert_eq!(gif.frame_sizes, vec![(200, 200); 3]);
    assert_eq!(gif.delays, vec![50, 50, 50]);
    assert_eq!(gif.repeat, gif::Repeat::Infinite);
}

#[test]
fn single_file_keeps_source_dimensions() {
    let dir = tempdir().unwrap();
    let sizes = FixtureGenerator::new(None)
        .different_sizes(&dir.path().join("sizes"))
        .unwrap();
    let wide = &sizes[1];
    let out = dir.path().join("single.gif");

    converter().convert(wide, &out, 1.0, 0).unwrap();

    let gif = decode_gif(&out);
    assert_eq!(gif.frame_sizes, vec![(200, 100)]);
    assert_eq!(gif.delays, vec![100]);
}

#[test]
fn every_supported_format_loads() {
    let dir = tempdir().unwrap();
    let formats = dir.path().join("formats");
    FixtureGenerator::new(None)
        .different_formats(&formats, (150, 150))
        .unwrap();
    let out = dir.path().join("formats.gif");

    converter().convert(&formats, &out, 0.1, 0).unwrap();

    assert_eq!(decode_gif(&out).frame_sizes, vec![(150, 150); 4]);
}

#[test]
fn resize_to_width_uses_first_frame_ratio() {
    let dir = tempdir().unwrap();
    let frames = dir.path().join("mixed");
    let generator = FixtureGenerator::new(None);
    generator.different_sizes(&frames).unwrap();
    // Sorts before the `size_*` files, so it decides the target ratio.
    generator.basic_sequence(&frames, 1, (400, 200), "a").unwrap();
    let out = dir.path().join("resized.gif");

    let config = GifConfig::default().with_size(Some(100), None);
    converter().convert_with_config(&frames, &out, &config).unwrap();

    let gif = decode_gif(&out);
    assert_eq!(gif.frame_sizes, vec![(100, 50); 5]);
}

#[test]
fn config_fps_and_finite_loop_are_embedded() {
    let dir = tempdir().unwrap();
    let frames = dir.path().join("frames");
    FixtureGenerator::new(None)
        .basic_sequence(&frames, 2, (40, 40), "frame")
        .unwrap();
    let out = dir.path().join("nested/deeper/out.gif");

    let config = GifConfig::default()
        .with_fps(5.0)
        .with_loop_count(3)
        .with_optimize(true, 90);
    converter().convert_with_config(&frames, &out, &config).unwrap();

    let gif = decode_gif(&out);
    assert_eq!(gif.delays, vec![20, 20]);
    assert_eq!(gif.repeat, gif::Repeat::Finite(3));
}

#[test]
fn per_frame_durations_are_embedded_in_order() {
    let dir = tempdir().unwrap();
    let frames = dir.path().join("frames");
    FixtureGenerator::new(None)
        .basic_sequence(&frames, 3, (16, 16), "frame")
        .unwrap();
    let out = dir.path().join("out.gif");

    converter()
        .convert(&frames, &out, DurationSpec::PerFrame(vec![0.1, 0.2, 0.3]), 0)
        .unwrap();

    assert_eq!(decode_gif(&out).delays, vec![10, 20, 30]);
}

#[test]
fn mixed_sizes_without_resize_fail_as_conversion_error() {
    let dir = tempdir().unwrap();
    let frames = dir.path().join("sizes");
    FixtureGenerator::new(None).different_sizes(&frames).unwrap();

    let err = converter()
        .convert(&frames, dir.path().join("out.gif"), 1.0, 0)
        .unwrap_err();
    assert!(matches!(err, Error::Conversion(_)), "got {err:?}");
}

#[test]
fn corrupt_file_reports_its_position() {
    let dir = tempdir().unwrap();
    let frames = dir.path().join("frames");
    FixtureGenerator::new(None)
        .basic_sequence(&frames, 2, (16, 16), "frame")
        .unwrap();
    std::fs::write(frames.join("frame_002.png"), b"not an image").unwrap();

    let err = converter()
        .convert(&frames, dir.path().join("out.gif"), 1.0, 0)
        .unwrap_err();
    match err {
        Error::ImageLoad { path, position, .. } => {
            assert_eq!(position, 2);
            assert!(path.ends_with("frame_002.png"));
        }
        other => panic!("expected ImageLoad, got {other:?}"),
    }
}
