//! Opacity masks that fade the bar into the photo.

use image::{GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;

/// Generates feathered opacity masks.
pub struct FeatherMask;

impl FeatherMask {
    /// Linear ramp without blur.
    ///
    /// Rows `[0, feather)` hold `255 * row / feather` (floored), later rows 255.
    /// `feather` is clamped to `height`; zero yields a fully opaque mask.
    pub fn ramp(width: u32, height: u32, feather: u32) -> GrayImage {
        let feather = feather.min(height);
        GrayImage::from_fn(width, height, |_, y| {
            if y < feather {
                Luma([(255 * y / feather) as u8])
            } else {
                Luma([255])
            }
        })
    }

    /// Ramp softened by a Gaussian blur with sigma `feather / 2`.
    pub fn generate(width: u32, height: u32, feather: u32) -> GrayImage {
        let mask = Self::ramp(width, height, feather);
        if feather == 0 || width == 0 || height == 0 {
            return mask;
        }
        gaussian_blur_f32(&mask, feather as f32 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(mask: &GrayImage, x: u32) -> Vec<u8> {
        (0..mask.height()).map(|y| mask.get_pixel(x, y)[0]).collect()
    }

    #[test]
    fn test_ramp_values() {
        let mask = FeatherMask::ramp(16, 40, 10);
        let col = column(&mask, 3);
        assert_eq!(col[0], 0);
        assert_eq!(col[5], 127);
        assert_eq!(col[9], 229);
        assert!(col[10..].iter().all(|&v| v == 255));
        assert!(col.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_blurred_mask_stays_in_range_and_monotonic() {
        let mask = FeatherMask::generate(16, 40, 10);
        assert_eq!(mask.dimensions(), (16, 40));
        let col = column(&mask, 8);
        // The blur lifts the first row off zero but never makes the fade reverse
        assert!(col[0] < 128);
        assert!(col[39] >= 250);
        assert!(col.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_rows_are_uniform() {
        let mask = FeatherMask::generate(12, 20, 6);
        for y in 0..20 {
            let first = mask.get_pixel(0, y)[0];
            assert!((0..12).all(|x| mask.get_pixel(x, y)[0] == first));
        }
    }

    #[test]
    fn test_zero_feather_is_opaque() {
        let mask = FeatherMask::generate(8, 5, 0);
        assert!(mask.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_feather_clamped_to_height() {
        let mask = FeatherMask::ramp(2, 4, 10);
        assert_eq!(column(&mask, 0), vec![0, 63, 127, 191]);
    }
}
