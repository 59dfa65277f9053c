//! Content provider contract
//!
//! The compositor never draws content itself; it asks a provider to render
//! a category at an exact size and pastes whatever comes back.

use crate::category::Category;
use page_canvas::Asset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chart kind hint for graph blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureKind {
    Line,
    Bar,
    Scatter,
    Blank,
}

impl FigureKind {
    pub const ALL: [FigureKind; 4] = [
        FigureKind::Line,
        FigureKind::Bar,
        FigureKind::Scatter,
        FigureKind::Blank,
    ];
}

/// Category-specific rendering hints
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderContext {
    /// Draw text in a heavier weight
    pub bold: bool,
    /// Nominal font size in pixels
    pub font_size: u32,
    /// Chart kind for graphs
    pub figure: Option<FigureKind>,
    /// Height of the caption strip at the bottom of the asset
    pub caption_height: u32,
    /// Literal label, e.g. the page number text
    pub label: Option<String>,
    /// Seed for any randomness inside the provider
    pub seed: u64,
}

/// One render call
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub category: Category,
    pub width: u32,
    pub height: u32,
    pub context: RenderContext,
}

/// Typed rendering failure; always recoverable at block level
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid size {width}x{height} for {category}")]
    InvalidSize {
        category: Category,
        width: u32,
        height: u32,
    },

    #[error("Category {0} has no rendered asset")]
    Unsupported(Category),

    #[error("Content source unavailable: {0}")]
    Source(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Canvas error: {0}")]
    Canvas(#[from] page_canvas::CanvasError),
}

/// Renders a category at a requested size
///
/// Implementations must be reentrant: the generator calls them from
/// several threads and never expects them to mutate shared state.
pub trait ContentProvider: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<Asset, RenderError>;
}

impl<P: ContentProvider + ?Sized> ContentProvider for &P {
    fn render(&self, request: &RenderRequest) -> Result<Asset, RenderError> {
        (**self).render(request)
    }
}

impl<P: ContentProvider + ?Sized> ContentProvider for Box<P> {
    fn render(&self, request: &RenderRequest) -> Result<Asset, RenderError> {
        (**self).render(request)
    }
}

/// Provider that paints flat, category-coloured blocks
///
/// Useful for layout debugging and for tests that only care about geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidProvider;

impl SolidProvider {
    pub fn color(category: Category) -> image::Rgb<u8> {
        match category {
            Category::Graph => image::Rgb([70, 110, 200]),
            Category::Image => image::Rgb([90, 170, 90]),
            Category::Text => image::Rgb([60, 60, 60]),
            Category::PageNumber => image::Rgb([200, 80, 80]),
            _ => image::Rgb([180, 180, 180]),
        }
    }
}

impl ContentProvider for SolidProvider {
    fn render(&self, request: &RenderRequest) -> Result<Asset, RenderError> {
        if request.width == 0 || request.height == 0 {
            return Err(RenderError::InvalidSize {
                category: request.category,
                width: request.width,
                height: request.height,
            });
        }
        if !request.category.is_rendered() {
            return Err(RenderError::Unsupported(request.category));
        }
        Ok(image::ImageBuffer::from_pixel(
            request.width,
            request.height,
            Self::color(request.category),
        ))
    }
}
