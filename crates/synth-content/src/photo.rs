//! Photographic content
//!
//! Photos come from two folders, a "science" one (microscopy, apparatus,
//! specimens) and a general one, mixed by a configurable share. Every photo
//! is cropped at random to the frame's aspect ratio before resizing, so the
//! same file yields a different picture each time it is drawn. Photos whose
//! shape is far from the frame's are letterboxed whole instead. Without a
//! library, or when a file cannot be decoded, a procedural scene stands in.

use crate::corpus::Corpus;
use crate::text::draw_caption;
use crate::typeface::Typeface;
use crate::{ContentError, Result};
use image::imageops;
use image::{ImageBuffer, Rgb};
use page_canvas::{decode_asset, draw, fit_to_frame, Asset, ImageScaleMode, WHITE};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Aspect mismatch beyond which a photo is letterboxed rather than cropped
const LETTERBOX_RATIO: f64 = 2.0;

/// Share of photos drawn from the science folder when both are present
pub const DEFAULT_SCIENCE_SHARE: f64 = 0.9;

/// Photo files split into science and general folders
#[derive(Debug, Clone, Default)]
pub struct PhotoLibrary {
    science: Vec<PathBuf>,
    other: Vec<PathBuf>,
    science_share: f64,
}

impl PhotoLibrary {
    /// Scan folders for JPEG and PNG files
    ///
    /// Either folder may be omitted. Files are listed in name order so a
    /// seeded run picks the same photos on every machine.
    ///
    /// # Arguments
    /// * `science` - Folder of science photos
    /// * `other` - Folder of general photos
    /// * `science_share` - Probability of drawing from `science`, clamped to [0, 1]
    pub fn scan(science: Option<&Path>, other: Option<&Path>, science_share: f64) -> Result<Self> {
        let library = Self {
            science: science.map(list_photos).transpose()?.unwrap_or_default(),
            other: other.map(list_photos).transpose()?.unwrap_or_default(),
            science_share: science_share.clamp(0.0, 1.0),
        };
        log::debug!(
            "photo library: {} science, {} other",
            library.science.len(),
            library.other.len()
        );
        Ok(library)
    }

    pub fn len(&self) -> usize {
        self.science.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn science_share(&self) -> f64 {
        self.science_share
    }

    /// Pick one photo, honouring the science share when both folders have files
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Path> {
        let pool = match (self.science.is_empty(), self.other.is_empty()) {
            (true, true) => return None,
            (false, true) => &self.science,
            (true, false) => &self.other,
            (false, false) => {
                if rng.gen_bool(self.science_share) {
                    &self.science
                } else {
                    &self.other
                }
            }
        };
        pool.choose(rng).map(PathBuf::as_path)
    }
}

fn list_photos(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ContentError::PhotoError(format!("Failed to read {}: {}", dir.display(), e))
    })?;

    let mut photos = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_photo = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_photo && path.is_file() {
            photos.push(path);
        }
    }
    photos.sort();
    Ok(photos)
}

/// Random crop of `source` with the aspect ratio of `width` x `height`
///
/// The crop keeps between 60% and 100% of the largest window of that ratio.
fn random_crop<R: Rng + ?Sized>(rng: &mut R, source: &Asset, width: u32, height: u32) -> Asset {
    let (sw, sh) = source.dimensions();
    if sw == 0 || sh == 0 || width == 0 || height == 0 {
        return source.clone();
    }
    let target = width as f64 / height as f64;
    let (max_w, max_h) = if sw as f64 / sh as f64 > target {
        ((sh as f64 * target) as u32, sh)
    } else {
        (sw, (sw as f64 / target) as u32)
    };

    let scale = rng.gen_range(0.6..=1.0);
    let cw = ((max_w as f64 * scale) as u32).clamp(1, sw);
    let ch = ((max_h as f64 * scale) as u32).clamp(1, sh);
    let x = rng.gen_range(0..=sw - cw);
    let y = rng.gen_range(0..=sh - ch);
    imageops::crop_imm(source, x, y, cw, ch).to_image()
}

/// Fit a decoded photo into the `width` x `height` graphic area
fn frame_photo<R: Rng + ?Sized>(
    rng: &mut R,
    photo: &Asset,
    width: u32,
    height: u32,
) -> page_canvas::Result<Asset> {
    let source = photo.width() as f64 / photo.height().max(1) as f64;
    let target = width as f64 / height.max(1) as f64;
    let mismatch = (source / target).max(target / source);
    if mismatch > LETTERBOX_RATIO {
        return fit_to_frame(photo, width, height, ImageScaleMode::FitBox);
    }
    let crop = random_crop(rng, photo, width, height);
    fit_to_frame(&crop, width, height, ImageScaleMode::Stretch)
}

/// Procedural stand-in photo: a graded sky over ground with a few shapes
fn procedural_scene<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32) -> Asset {
    let top: [f32; 3] = [rng.gen_range(120.0..220.0), rng.gen_range(140.0..220.0), 235.0];
    let bottom: [f32; 3] = [
        rng.gen_range(40.0..120.0),
        rng.gen_range(70.0..150.0),
        rng.gen_range(30.0..90.0),
    ];
    let horizon = rng.gen_range(0.4..0.75);

    let mut image: Asset = ImageBuffer::new(width, height);
    for (_, y, pixel) in image.enumerate_pixels_mut() {
        let t = y as f32 / height.max(1) as f32;
        let (from, to, k) = if t < horizon {
            (top, [235.0, 235.0, 240.0], t / horizon)
        } else {
            (bottom, [bottom[0] * 0.6, bottom[1] * 0.6, bottom[2] * 0.6], (t - horizon) / (1.0 - horizon))
        };
        *pixel = Rgb([
            (from[0] + (to[0] - from[0]) * k) as u8,
            (from[1] + (to[1] - from[1]) * k) as u8,
            (from[2] + (to[2] - from[2]) * k) as u8,
        ]);
    }

    for _ in 0..rng.gen_range(2..=6) {
        let w = rng.gen_range(1..=(width / 3).max(1));
        let h = rng.gen_range(1..=(height / 3).max(1));
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        let color = Rgb([rng.gen(), rng.gen(), rng.gen()]);
        draw::fill_rect(&mut image, x, y, w, h, color);
    }
    image
}

/// Everything a photo render needs besides the frame size
pub struct PhotoSource<'a> {
    pub library: Option<&'a PhotoLibrary>,
    pub face: &'a Typeface,
    pub corpus: &'a Corpus,
}

/// Render a photo block of exactly `width` x `height`
///
/// The bottom `caption_height` rows hold a figure caption when non-zero.
pub fn render_photo<R: Rng + ?Sized>(
    source: &PhotoSource<'_>,
    rng: &mut R,
    width: u32,
    height: u32,
    caption_height: u32,
) -> page_canvas::Result<Asset> {
    let graphic_h = if caption_height > 0 && height > caption_height {
        height - caption_height
    } else {
        height
    };

    let loaded = source.library.and_then(|lib| lib.pick(rng)).and_then(|path| {
        match fs::read(path).map_err(page_canvas::CanvasError::from).and_then(|d| decode_asset(&d)) {
            Ok(photo) if photo.width() > 0 && photo.height() > 0 => Some(photo),
            Ok(_) => None,
            Err(e) => {
                log::warn!("falling back to a procedural photo, {}: {}", path.display(), e);
                None
            }
        }
    });

    let graphic = match loaded {
        Some(photo) => frame_photo(rng, &photo, width, graphic_h)?,
        None => procedural_scene(rng, width, graphic_h),
    };

    if graphic_h == height {
        return Ok(graphic);
    }

    let mut image: Asset = ImageBuffer::from_pixel(width, height, WHITE);
    imageops::replace(&mut image, &graphic, 0, 0);
    draw_caption(&mut image, source.face, source.corpus, rng, graphic_h, height - graphic_h);
    Ok(image)
}
