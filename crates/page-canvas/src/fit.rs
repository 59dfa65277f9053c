//! Asset decoding and fitting

use crate::{Asset, CanvasError, Result, WHITE};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer};

/// Image scaling mode for fitting an asset into a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageScaleMode {
    /// Stretch to exact dimensions
    #[default]
    Stretch,
    /// Fit within bounding box, preserving aspect ratio
    FitBox,
}

/// Calculate display dimensions based on scaling mode
///
/// # Arguments
/// * `original_width` - Original image width in pixels
/// * `original_height` - Original image height in pixels
/// * `target_width` - Target width in pixels
/// * `target_height` - Target height in pixels
/// * `mode` - Scaling mode
///
/// # Returns
/// (actual_width, actual_height) in pixels, never zero
pub fn calculate_scaled_dimensions(
    original_width: u32,
    original_height: u32,
    target_width: u32,
    target_height: u32,
    mode: ImageScaleMode,
) -> (u32, u32) {
    let ow = original_width.max(1) as f64;
    let oh = original_height.max(1) as f64;
    let tw = target_width as f64;
    let th = target_height as f64;

    let (w, h) = match mode {
        ImageScaleMode::Stretch => (tw, th),
        ImageScaleMode::FitBox => {
            let scale = (tw / ow).min(th / oh);
            (ow * scale, oh * scale)
        }
    };

    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Fit an asset into an exact `width` x `height` frame
///
/// `Stretch` resizes directly. `FitBox` resizes proportionally and centers
/// the result on a white frame, so the returned asset always has exactly
/// the requested dimensions.
pub fn fit_to_frame(asset: &Asset, width: u32, height: u32, mode: ImageScaleMode) -> Result<Asset> {
    if width == 0 || height == 0 {
        return Err(CanvasError::InvalidSize(width, height));
    }
    if asset.width() == width && asset.height() == height {
        return Ok(asset.clone());
    }

    let (sw, sh) =
        calculate_scaled_dimensions(asset.width(), asset.height(), width, height, mode);
    let scaled = imageops::resize(asset, sw, sh, FilterType::Lanczos3);
    if sw == width && sh == height {
        return Ok(scaled);
    }

    let mut frame: Asset = ImageBuffer::from_pixel(width, height, WHITE);
    let dx = (width as i64 - sw as i64) / 2;
    let dy = (height as i64 - sh as i64) / 2;
    imageops::replace(&mut frame, &scaled, dx, dy);
    Ok(frame)
}

/// Flatten any decoded image onto a white background as RGB
///
/// Alpha channels are blended against white rather than dropped, so
/// transparent PNG content does not turn black on the page.
pub fn flatten_alpha(image: &DynamicImage) -> Asset {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut rgb: Asset = ImageBuffer::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(rgb.pixels_mut()) {
        let alpha = src[3] as f32 / 255.0;
        for c in 0..3 {
            dst[c] = (src[c] as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        }
    }
    rgb
}

/// Decode JPEG or PNG bytes into an RGB asset
pub fn decode_asset(data: &[u8]) -> Result<Asset> {
    let image = image::load_from_memory(data)?;
    Ok(flatten_alpha(&image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_image_scale_mode_default() {
        assert_eq!(ImageScaleMode::default(), ImageScaleMode::Stretch);
    }

    #[test]
    fn test_calculate_scaled_dimensions_stretch() {
        let (w, h) = calculate_scaled_dimensions(800, 600, 100, 200, ImageScaleMode::Stretch);
        assert_eq!((w, h), (100, 200));
    }

    #[test]
    fn test_calculate_scaled_dimensions_fit_box() {
        // Width limited
        assert_eq!(
            calculate_scaled_dimensions(800, 600, 100, 200, ImageScaleMode::FitBox),
            (100, 75)
        );
        // Height limited
        assert_eq!(
            calculate_scaled_dimensions(600, 800, 200, 100, ImageScaleMode::FitBox),
            (75, 100)
        );
    }

    #[test]
    fn test_calculate_scaled_dimensions_never_zero() {
        let (w, h) = calculate_scaled_dimensions(1000, 1, 10, 10, ImageScaleMode::FitBox);
        assert_eq!(w, 10);
        assert_eq!(h, 1);
    }

    #[test]
    fn test_fit_to_frame_exact_size() {
        let asset: Asset = ImageBuffer::from_pixel(40, 30, image::Rgb([10, 20, 30]));
        for mode in [ImageScaleMode::Stretch, ImageScaleMode::FitBox] {
            let fitted = fit_to_frame(&asset, 100, 50, mode).unwrap();
            assert_eq!(fitted.dimensions(), (100, 50), "mode {mode:?}");
        }
    }

    #[test]
    fn test_fit_to_frame_letterbox_is_white() {
        let asset: Asset = ImageBuffer::from_pixel(10, 10, image::Rgb([0, 0, 0]));
        let fitted = fit_to_frame(&asset, 100, 50, ImageScaleMode::FitBox).unwrap();
        // Left edge is padding, center is content
        assert_eq!(*fitted.get_pixel(0, 25), WHITE);
        assert_eq!(*fitted.get_pixel(50, 25), image::Rgb([0, 0, 0]));
    }

    #[test]
    fn test_fit_to_frame_zero_size() {
        let asset: Asset = ImageBuffer::from_pixel(10, 10, WHITE);
        assert!(fit_to_frame(&asset, 0, 10, ImageScaleMode::Stretch).is_err());
    }

    #[test]
    fn test_flatten_alpha_blends_with_white() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([0, 0, 0, 255]));

        let flat = flatten_alpha(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(*flat.get_pixel(0, 0), WHITE);
        assert_eq!(flat.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_decode_asset_rejects_garbage() {
        assert!(decode_asset(&[0x00, 0x01, 0x02, 0x03]).is_err());
    }
}
