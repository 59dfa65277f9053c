//! Page Canvas - Low-level raster page manipulation
//!
//! This crate provides functionality for:
//! - Creating blank page canvases
//! - Pasting rendered assets at pixel coordinates
//! - Fitting assets to a requested frame (stretch, fit-box)
//! - Simple drawing primitives used by content renderers
//! - Digital-artifact filtering (noise, recompression)
//! - Encoding finished pages (JPEG, PNG)
//!
//! # Example
//!
//! ```ignore
//! use page_canvas::{PageCanvas, OutputFormat};
//!
//! let mut canvas = PageCanvas::blank(1200, 1600);
//! canvas.paste(&asset, 50, 50)?;
//! let bytes = canvas.encode(OutputFormat::Jpeg { quality: 95 })?;
//! ```

mod artifacts;
mod canvas;
pub mod draw;
mod fit;

pub use artifacts::ArtifactFilter;
pub use canvas::{OutputFormat, PageCanvas};
pub use fit::{
    calculate_scaled_dimensions, decode_asset, fit_to_frame, flatten_alpha, ImageScaleMode,
};

/// A rendered visual asset, always 8-bit RGB on a white background
pub type Asset = image::RgbImage;

use thiserror::Error;

/// Errors that can occur during canvas operations
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Asset {width}x{height} at ({x}, {y}) does not fit a {canvas_width}x{canvas_height} canvas")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    #[error("Invalid asset size: {0}x{1}")]
    InvalidSize(u32, u32),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<image::ImageError> for CanvasError {
    fn from(err: image::ImageError) -> Self {
        CanvasError::ImageError(err.to_string())
    }
}

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;

/// White background pixel
pub const WHITE: image::Rgb<u8> = image::Rgb([255, 255, 255]);

/// Black ink pixel
pub const BLACK: image::Rgb<u8> = image::Rgb([0, 0, 0]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = CanvasError::OutOfBounds {
            x: 10,
            y: 20,
            width: 30,
            height: 40,
            canvas_width: 35,
            canvas_height: 50,
        };
        assert_eq!(
            err.to_string(),
            "Asset 30x40 at (10, 20) does not fit a 35x50 canvas"
        );
    }

    #[test]
    fn test_palette_constants() {
        assert_eq!(WHITE.0, [255, 255, 255]);
        assert_eq!(BLACK.0, [0, 0, 0]);
    }
}
