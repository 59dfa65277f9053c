//! Text rasterisation
//!
//! Two faces are supported:
//! - an outline font loaded from TTF/OTF bytes and rasterised with `ab_glyph`
//! - a greeked face that draws every glyph as a solid bar with realistic
//!   x-height, ascenders and descenders, needing no font file at all

use crate::{ContentError, Result};
use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::Rgb;
use page_canvas::{draw, Asset};
use std::path::Path;
use std::sync::Arc;

/// Ink colour for body text
pub const INK: Rgb<u8> = Rgb([25, 25, 25]);

/// Size, weight and colour of a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub size: u32,
    pub bold: bool,
    pub color: Rgb<u8>,
}

impl TextStyle {
    pub fn new(size: u32, bold: bool) -> Self {
        Self {
            size,
            bold,
            color: INK,
        }
    }
}

#[derive(Clone)]
enum Face {
    Greeked,
    Outline(Arc<FontVec>),
}

/// A face that can measure and draw words
#[derive(Clone)]
pub struct Typeface {
    face: Face,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.face {
            Face::Greeked => "greeked",
            Face::Outline(_) => "outline",
        };
        f.debug_struct("Typeface").field("face", &kind).finish()
    }
}

impl Default for Typeface {
    fn default() -> Self {
        Self::greeked()
    }
}

impl Typeface {
    /// Font-free face drawing glyphs as bars
    pub fn greeked() -> Self {
        Self {
            face: Face::Greeked,
        }
    }

    /// Parse an outline font from raw TTF/OTF data
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data)
            .map_err(|e| ContentError::FontError(e.to_string()))?;
        Ok(Self {
            face: Face::Outline(Arc::new(font)),
        })
    }

    /// Load an outline font from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            ContentError::FontError(format!("Failed to read font {}: {}", path.display(), e))
        })?;
        Self::from_bytes(data)
    }

    pub fn is_outline(&self) -> bool {
        matches!(self.face, Face::Outline(_))
    }

    /// Advance width of a word in pixels
    pub fn measure(&self, word: &str, size: u32, bold: bool) -> u32 {
        let size = size.max(1) as f32;
        let width = match &self.face {
            Face::Greeked => word.chars().map(|c| greek_advance(c, size)).sum::<f32>(),
            Face::Outline(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                let mut width = 0.0;
                let mut prev = None;
                for c in word.chars() {
                    let id = scaled.glyph_id(c);
                    if let Some(p) = prev {
                        width += scaled.kern(p, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width
            }
        };
        let bold_extra = if bold { (size / 12.0).ceil() } else { 0.0 };
        (width + bold_extra).ceil() as u32
    }

    /// Width of an inter-word space
    pub fn space(&self, size: u32) -> u32 {
        ((size.max(1) as f32) * 0.3).ceil() as u32
    }

    /// Distance between baselines of consecutive lines
    pub fn line_height(&self, size: u32) -> u32 {
        ((size.max(1) as f32) * 1.35).ceil() as u32
    }

    /// Draw a word with its em box top-left at `(x, y)`
    pub fn draw_word(&self, image: &mut Asset, x: u32, y: u32, word: &str, style: &TextStyle) {
        let TextStyle { size, bold, color } = *style;
        let size_f = size.max(1) as f32;
        match &self.face {
            Face::Greeked => {
                let mut cursor = x as f32;
                for c in word.chars() {
                    let advance = greek_advance(c, size_f);
                    if let Some((top, bottom)) = greek_extent(c) {
                        let gutter = (size_f * 0.08).max(1.0);
                        let ink = (advance - gutter).max(1.0);
                        let ink = if bold { ink + gutter / 2.0 } else { ink };
                        let y0 = y as f32 + top * size_f;
                        let y1 = y as f32 + bottom * size_f;
                        draw::fill_rect(
                            image,
                            cursor as u32,
                            y0 as u32,
                            ink.round() as u32,
                            (y1 - y0).round().max(1.0) as u32,
                            color,
                        );
                    }
                    cursor += advance;
                }
            }
            Face::Outline(font) => {
                let scale = PxScale::from(size_f);
                let scaled = font.as_scaled(scale);
                let baseline = y as f32 + scaled.ascent();
                let passes: &[f32] = if bold { &[0.0, 1.0] } else { &[0.0] };
                for &dx in passes {
                    let mut cursor = x as f32 + dx;
                    let mut prev = None;
                    for c in word.chars() {
                        let id = scaled.glyph_id(c);
                        if let Some(p) = prev {
                            cursor += scaled.kern(p, id);
                        }
                        let glyph = id.with_scale_and_position(scale, point(cursor, baseline));
                        cursor += scaled.h_advance(id);
                        prev = Some(id);

                        if let Some(outlined) = font.outline_glyph(glyph) {
                            let bounds = outlined.px_bounds();
                            outlined.draw(|gx, gy, coverage| {
                                let px = bounds.min.x as i64 + gx as i64;
                                let py = bounds.min.y as i64 + gy as i64;
                                blend(image, px, py, color, coverage);
                            });
                        }
                    }
                }
            }
        }
    }
}

/// Blend `color` into a pixel by `coverage`, ignoring out-of-bounds pixels
fn blend(image: &mut Asset, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = image.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let bg = pixel[c] as f32;
        pixel[c] = (bg + (color[c] as f32 - bg) * coverage).round() as u8;
    }
}

fn greek_advance(c: char, size: f32) -> f32 {
    let em = match c {
        'i' | 'l' | 'j' | '.' | ',' | '\'' | '!' | ':' | ';' | '|' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '-' => 0.36,
        'm' | 'w' => 0.8,
        'M' | 'W' => 0.88,
        'A'..='Z' => 0.66,
        '0'..='9' => 0.5,
        ' ' => 0.3,
        _ => 0.52,
    };
    em * size
}

/// Vertical ink extent of a glyph as fractions of the em box
fn greek_extent(c: char) -> Option<(f32, f32)> {
    match c {
        ' ' => None,
        '.' | ',' => Some((0.68, 0.78)),
        '-' => Some((0.5, 0.56)),
        'g' | 'j' | 'p' | 'q' | 'y' => Some((0.38, 0.95)),
        'b' | 'd' | 'f' | 'h' | 'k' | 'l' | 't' | 'i' => Some((0.12, 0.78)),
        'A'..='Z' | '0'..='9' => Some((0.1, 0.78)),
        _ => Some((0.38, 0.78)),
    }
}
