//! Digital-artifact filter applied to finished pages
//!
//! The filter only perturbs pixel values; it never moves content, so
//! annotations computed before filtering stay valid.

use crate::canvas::encode_image;
use crate::fit::decode_asset;
use crate::{Asset, CanvasError, OutputFormat, Result};
use rand::Rng;

/// Noise injection and lossy recompression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArtifactFilter {
    /// Maximum per-channel deviation of uniform noise (0 disables)
    pub noise: u8,
    /// JPEG quality for a recompression round trip
    pub jpeg_quality: Option<u8>,
}

impl ArtifactFilter {
    /// Create a filter from its parameters
    pub fn new(noise: u8, jpeg_quality: Option<u8>) -> Self {
        Self {
            noise,
            jpeg_quality,
        }
    }

    /// Returns true if the filter would leave every pixel untouched
    pub fn is_noop(&self) -> bool {
        self.noise == 0 && self.jpeg_quality.is_none()
    }

    /// Apply the filter, returning a new image of identical dimensions
    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, page: &Asset) -> Result<Asset> {
        let mut out = page.clone();

        if self.noise > 0 {
            let amp = self.noise as i16;
            for pixel in out.pixels_mut() {
                for channel in pixel.0.iter_mut() {
                    let delta = rng.gen_range(-amp..=amp);
                    *channel = (*channel as i16 + delta).clamp(0, 255) as u8;
                }
            }
        }

        if let Some(quality) = self.jpeg_quality {
            let bytes = encode_image(&out, OutputFormat::Jpeg { quality })?;
            out = decode_asset(&bytes)?;
        }

        if out.dimensions() != page.dimensions() {
            return Err(CanvasError::ImageError(format!(
                "artifact filter changed page size from {:?} to {:?}",
                page.dimensions(),
                out.dimensions()
            )));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WHITE;
    use image::ImageBuffer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noop_filter() {
        let filter = ArtifactFilter::default();
        assert!(filter.is_noop());

        let page: Asset = ImageBuffer::from_pixel(8, 8, image::Rgb([120, 130, 140]));
        let mut rng = StdRng::seed_from_u64(1);
        let out = filter.apply(&mut rng, &page).unwrap();
        assert_eq!(out, page);
    }

    #[test]
    fn test_noise_stays_within_amplitude() {
        let filter = ArtifactFilter::new(4, None);
        let page: Asset = ImageBuffer::from_pixel(16, 16, image::Rgb([100, 100, 100]));
        let mut rng = StdRng::seed_from_u64(7);

        let out = filter.apply(&mut rng, &page).unwrap();
        assert!(out
            .pixels()
            .all(|p| p.0.iter().all(|&c| (96..=104).contains(&c))));
    }

    #[test]
    fn test_recompression_keeps_dimensions() {
        let filter = ArtifactFilter::new(3, Some(40));
        let page: Asset = ImageBuffer::from_pixel(33, 17, WHITE);
        let mut rng = StdRng::seed_from_u64(3);

        let out = filter.apply(&mut rng, &page).unwrap();
        assert_eq!(out.dimensions(), (33, 17));
    }
}
