//! Page canvas wrapper

use crate::{Asset, CanvasError, Result, WHITE};
use image::codecs::jpeg::JpegEncoder;
use image::{GenericImage, ImageBuffer, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// Encoding used when a finished page is handed to persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy JPEG with the given quality (1-100)
    Jpeg { quality: u8 },
    /// Lossless PNG
    Png,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg { quality: 95 }
    }
}

/// A blank white page that assets are composited onto
#[derive(Debug, Clone)]
pub struct PageCanvas {
    /// The underlying RGB buffer
    inner: Asset,
}

impl PageCanvas {
    /// Create a white canvas of the given pixel size
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            inner: ImageBuffer::from_pixel(width, height, WHITE),
        }
    }

    /// Wrap an existing RGB buffer
    pub fn from_image(image: Asset) -> Self {
        Self { inner: image }
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Borrow the underlying image
    pub fn image(&self) -> &Asset {
        &self.inner
    }

    /// Mutable access for drawing directly on the page
    pub fn image_mut(&mut self) -> &mut Asset {
        &mut self.inner
    }

    /// Consume the canvas, returning the underlying image
    pub fn into_image(self) -> Asset {
        self.inner
    }

    /// Paste an asset with its top-left corner at `(x, y)`
    ///
    /// The asset must lie entirely on the canvas; nothing is drawn when it
    /// does not.
    pub fn paste(&mut self, asset: &Asset, x: u32, y: u32) -> Result<()> {
        let fits = x.checked_add(asset.width()).is_some_and(|r| r <= self.width())
            && y.checked_add(asset.height()).is_some_and(|b| b <= self.height());
        if !fits {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: asset.width(),
                height: asset.height(),
                canvas_width: self.width(),
                canvas_height: self.height(),
            });
        }

        self.inner.copy_from(asset, x, y)?;
        Ok(())
    }

    /// Encode the canvas into bytes
    pub fn encode(&self, format: OutputFormat) -> Result<Vec<u8>> {
        encode_image(&self.inner, format)
    }

    /// Encode and write the canvas to a file
    pub fn save<P: AsRef<Path>>(&self, path: P, format: OutputFormat) -> Result<()> {
        let bytes = self.encode(format)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Encode an RGB image into JPEG or PNG bytes
pub(crate) fn encode_image(image: &Asset, format: OutputFormat) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    match format {
        OutputFormat::Jpeg { quality } => {
            let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
            encoder.encode_image(image)?;
        }
        OutputFormat::Png => {
            let mut cursor = Cursor::new(&mut bytes);
            image.write_to(&mut cursor, ImageFormat::Png)?;
        }
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLACK;

    #[test]
    fn test_blank_is_white() {
        let canvas = PageCanvas::blank(20, 10);
        assert_eq!(canvas.width(), 20);
        assert_eq!(canvas.height(), 10);
        assert!(canvas.image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_paste_at_origin() {
        let mut canvas = PageCanvas::blank(20, 10);
        let asset: Asset = ImageBuffer::from_pixel(5, 5, BLACK);
        canvas.paste(&asset, 3, 2).unwrap();

        assert_eq!(*canvas.image().get_pixel(3, 2), BLACK);
        assert_eq!(*canvas.image().get_pixel(7, 6), BLACK);
        assert_eq!(*canvas.image().get_pixel(8, 6), WHITE);
        assert_eq!(*canvas.image().get_pixel(2, 2), WHITE);
    }

    #[test]
    fn test_paste_flush_with_edge() {
        let mut canvas = PageCanvas::blank(20, 10);
        let asset: Asset = ImageBuffer::from_pixel(5, 5, BLACK);
        assert!(canvas.paste(&asset, 15, 5).is_ok());
    }

    #[test]
    fn test_paste_out_of_bounds_leaves_canvas_untouched() {
        let mut canvas = PageCanvas::blank(20, 10);
        let asset: Asset = ImageBuffer::from_pixel(5, 5, BLACK);

        let err = canvas.paste(&asset, 16, 0).unwrap_err();
        assert!(matches!(err, CanvasError::OutOfBounds { x: 16, .. }));
        assert!(canvas.image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_encode_jpeg_and_png_signatures() {
        let canvas = PageCanvas::blank(16, 16);

        let jpeg = canvas.encode(OutputFormat::Jpeg { quality: 90 }).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let png = canvas.encode(OutputFormat::Png).unwrap();
        assert_eq!(&png[..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::default().extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }
}
