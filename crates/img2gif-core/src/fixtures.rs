//! Synthetic test images: solid-colour sequences, format variants, mixed
//! sizes and a single shape image.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, FontVec, PxScale};
use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_ellipse_mut, draw_hollow_ellipse_mut, draw_text_mut, text_size,
};
use tracing::{debug, info, warn};

const SEQUENCE_COLORS: [Rgb<u8>; 5] = [
    Rgb([255, 100, 100]),
    Rgb([100, 255, 100]),
    Rgb([100, 100, 255]),
    Rgb([255, 255, 100]),
    Rgb([255, 100, 255]),
];

const SIZE_VARIANTS: [((u32, u32), Rgb<u8>); 4] = [
    ((100, 100), Rgb([200, 100, 100])),
    ((200, 100), Rgb([100, 200, 100])),
    ((100, 200), Rgb([100, 100, 200])),
    ((300, 300), Rgb([200, 200, 100])),
];

/// DejaVu Sans Mono, used when no other font is supplied.
const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

const LABEL_SCALE: f32 = 24.0;
const OUTLINE_OFFSET: i32 = 2;
const JPEG_QUALITY: u8 = 95;

const SINGLE_BACKGROUND: Rgb<u8> = Rgb([150, 150, 150]);
const SINGLE_FILL: Rgb<u8> = Rgb([100, 150, 255]);
const SINGLE_OUTLINE: Rgb<u8> = Rgb([50, 100, 200]);
const SINGLE_MARGIN: i32 = 20;
const SINGLE_OUTLINE_WIDTH: i32 = 3;

/// Paths of every image written by [`FixtureGenerator::generate_all`].
#[derive(Debug, Clone)]
pub struct GeneratedFixtures {
    pub basic_sequence: Vec<PathBuf>,
    /// Keyed by extension without the dot (`png`, `jpg`, `jpeg`, `bmp`).
    pub formats: BTreeMap<String, PathBuf>,
    pub sizes: Vec<PathBuf>,
    pub single: PathBuf,
}

/// Writes synthetic images with text labels. Without a caller-supplied
/// font the bundled one is used.
pub struct FixtureGenerator {
    font: Option<FontArc>,
}

impl FixtureGenerator {
    pub fn new(font: Option<FontVec>) -> Self {
        let font = font.map(FontArc::new).or_else(bundled_font);
        Self { font }
    }

    /// Load a TrueType/OpenType font from disk, falling back to the bundled one.
    pub fn with_font_file(path: &Path) -> Self {
        Self::new(load_font(path))
    }

    /// `count` solid frames cycling through five colours, each labelled with
    /// its 1-based number. Files are named `{prefix}_{NNN}.png`.
    pub fn basic_sequence(
        &self,
        dir: &Path,
        count: usize,
        (width, height): (u32, u32),
        prefix: &str,
    ) -> Result<Vec<PathBuf>> {
        ensure_dir(dir)?;

        let mut paths = Vec::with_capacity(count);
        for i in 0..count {
            let color = SEQUENCE_COLORS[i % SEQUENCE_COLORS.len()];
            let mut img = RgbImage::from_pixel(width, height, color);
            self.draw_centered_label(&mut img, &(i + 1).to_string());

            let path = dir.join(format!("{prefix}_{:03}.png", i + 1));
            save(&img, &path)?;
            paths.push(path);
        }

        info!(?dir, count, "generated basic sequence");
        Ok(paths)
    }

    /// One gradient image saved as PNG, JPG, JPEG and BMP.
    pub fn different_formats(
        &self,
        dir: &Path,
        (width, height): (u32, u32),
    ) -> Result<BTreeMap<String, PathBuf>> {
        ensure_dir(dir)?;

        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (255 * x / width) as u8,
                (255 * y / height) as u8,
                128,
            ])
        });

        let mut paths = BTreeMap::new();
        for ext in ["png", "jpg", "jpeg", "bmp"] {
            let path = dir.join(format!("test_image.{ext}"));
            if ext == "jpg" || ext == "jpeg" {
                save_jpeg(&img, &path)?;
            } else {
                save(&img, &path)?;
            }
            paths.insert(ext.to_string(), path);
        }

        info!(?dir, count = paths.len(), "generated format variants");
        Ok(paths)
    }

    /// Solid images of 100x100, 200x100, 100x200 and 300x300, each labelled
    /// with its size.
    pub fn different_sizes(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        ensure_dir(dir)?;

        let mut paths = Vec::with_capacity(SIZE_VARIANTS.len());
        for ((width, height), color) in SIZE_VARIANTS {
            let mut img = RgbImage::from_pixel(width, height, color);
            if let Some(font) = &self.font {
                let label = format!("{width}x{height}");
                draw_text_mut(&mut img, WHITE, 10, 10, PxScale::from(LABEL_SCALE), font, &label);
            }

            let path = dir.join(format!("size_{width}x{height}.png"));
            save(&img, &path)?;
            paths.push(path);
        }

        info!(?dir, count = paths.len(), "generated size variants");
        Ok(paths)
    }

    /// A grey image with an outlined blue ellipse inset from the edges.
    pub fn single_image(&self, dir: &Path, (width, height): (u32, u32)) -> Result<PathBuf> {
        ensure_dir(dir)?;

        let mut img = RgbImage::from_pixel(width, height, SINGLE_BACKGROUND);
        let center = (width as i32 / 2, height as i32 / 2);
        let rx = (width as i32 - 2 * SINGLE_MARGIN) / 2;
        let ry = (height as i32 - 2 * SINGLE_MARGIN) / 2;

        if rx > 0 && ry > 0 {
            draw_filled_ellipse_mut(&mut img, center, rx, ry, SINGLE_FILL);
            for inset in 0..SINGLE_OUTLINE_WIDTH.min(rx).min(ry) {
                draw_hollow_ellipse_mut(&mut img, center, rx - inset, ry - inset, SINGLE_OUTLINE);
            }
        }

        let path = dir.join("single_image.png");
        save(&img, &path)?;
        info!(?path, "generated single image");
        Ok(path)
    }

    /// Every fixture set under `base`, one subdirectory per set.
    pub fn generate_all(&self, base: &Path) -> Result<GeneratedFixtures> {
        Ok(GeneratedFixtures {
            basic_sequence: self.basic_sequence(
                &base.join("basic_sequence"),
                5,
                (200, 200),
                "frame",
            )?,
            formats: self.different_formats(&base.join("formats"), (150, 150))?,
            sizes: self.different_sizes(&base.join("sizes"))?,
            single: self.single_image(&base.join("single"), (200, 200))?,
        })
    }

    /// White label with a black outline, centred on the image.
    fn draw_centered_label(&self, img: &mut RgbImage, text: &str) {
        let Some(font) = &self.font else { return };
        let scale = PxScale::from(LABEL_SCALE);
        let (text_w, text_h) = text_size(scale, font, text);
        let x = (img.width() as i32 - text_w as i32) / 2;
        let y = (img.height() as i32 - text_h as i32) / 2;

        for dx in [-OUTLINE_OFFSET, 0, OUTLINE_OFFSET] {
            for dy in [-OUTLINE_OFFSET, 0, OUTLINE_OFFSET] {
                draw_text_mut(img, BLACK, x + dx, y + dy, scale, font, text);
            }
        }
        draw_text_mut(img, WHITE, x, y, scale, font, text);
    }
}

fn bundled_font() -> Option<FontArc> {
    match FontArc::try_from_slice(BUNDLED_FONT) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!(error = %e, "failed to parse bundled font, labels will be skipped");
            None
        }
    }
}

fn load_font(path: &Path) -> Option<FontVec> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            warn!(?path, error = %e, "failed to read font file");
            return None;
        }
    };
    match FontVec::try_from_vec(data) {
        Ok(font) => {
            info!(?path, "loaded fixture font");
            Some(font)
        }
        Err(e) => {
            warn!(?path, error = %e, "failed to parse font file");
            None
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create fixture directory {}", dir.display()))
}

fn save(img: &RgbImage, path: &Path) -> Result<()> {
    img.save(path)
        .with_context(|| format!("failed to save fixture to {}", path.display()))?;
    debug!(?path, "saved fixture");
    Ok(())
}

fn save_jpeg(img: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY)
        .encode_image(img)
        .with_context(|| format!("failed to encode JPEG fixture {}", path.display()))?;
    debug!(?path, "saved fixture");
    Ok(())
}
