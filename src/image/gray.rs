//! Luminance conversion from RGB grids.
//!
//! Screen and template go through the same formula so their correlation
//! scores are comparable: BT.601 weights (0.299, 0.587, 0.114) in 14-bit
//! fixed point with round-half-up.

use crate::image::{ColorImage, OwnedImage, CHANNELS};
use crate::util::ClickMatchResult;

const SHIFT: u32 = 14;
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Luminance of one RGB pixel.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = (R_WEIGHT * r as u32 + G_WEIGHT * g as u32 + B_WEIGHT * b as u32 + ROUND) >> SHIFT;
    y.min(255) as u8
}

/// Converts a color grid to a contiguous grayscale image.
///
/// Fails with `InvalidDimensions` for zero-sized input.
pub fn to_gray(img: &ColorImage) -> ClickMatchResult<OwnedImage> {
    let data = img
        .as_raw()
        .chunks_exact(CHANNELS)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect();
    OwnedImage::new(data, img.width(), img.height())
}

#[cfg(test)]
mod tests {
    use super::{luma, to_gray};
    use crate::image::ColorImage;
    use crate::util::ClickMatchError;

    #[test]
    fn weights_sum_to_unity() {
        assert_eq!(super::R_WEIGHT + super::G_WEIGHT + super::B_WEIGHT, 1 << super::SHIFT);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(128, 128, 128), 128);
    }

    #[test]
    fn channel_order_is_rgb() {
        // Green carries the largest weight, blue the smallest.
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn to_gray_preserves_layout() {
        let mut img = ColorImage::filled(3, 2, [0, 0, 0]);
        img.put_pixel(2, 1, [255, 255, 255]);
        let gray = to_gray(&img).unwrap();
        assert_eq!(gray.width(), 3);
        assert_eq!(gray.height(), 2);
        assert_eq!(gray.data(), &[0, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn to_gray_rejects_empty() {
        let img = ColorImage::filled(0, 4, [1, 2, 3]);
        assert_eq!(
            to_gray(&img).err().unwrap(),
            ClickMatchError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
    }
}
