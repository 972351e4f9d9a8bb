//! Template plan precomputation for zero-mean normalized correlation.

use crate::image::ImageView;

/// Grayscale template pixels plus the statistics every window score reuses.
///
/// `var_t` is the unnormalized variance `N * sum(T^2) - sum(T)^2`; it is zero
/// for a flat template, which then scores 0 against every window.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    sum_t: u64,
    var_t: u128,
}

impl TemplatePlan {
    /// Builds a plan from a grayscale template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> Self {
        let width = tpl.width();
        let height = tpl.height();
        let mut pixels = Vec::with_capacity(width * height);
        let mut sum_t = 0u64;
        let mut sum_t2 = 0u64;
        for y in 0..height {
            let Some(row) = tpl.row(y) else {
                break;
            };
            for &value in row {
                let v = value as u64;
                sum_t += v;
                sum_t2 += v * v;
                pixels.push(value);
            }
        }

        let n = (width * height) as u128;
        let var_t = n * sum_t2 as u128 - (sum_t as u128) * (sum_t as u128);

        Self {
            width,
            height,
            pixels,
            sum_t,
            var_t,
        }
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Returns true for a plan with no pixels (never produced by `from_view`).
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns row `y` of the grayscale template.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    /// Returns the sum of template intensities.
    pub fn sum_t(&self) -> u64 {
        self.sum_t
    }

    /// Returns `N * sum(T^2) - sum(T)^2`.
    pub fn var_t(&self) -> u128 {
        self.var_t
    }

    /// Returns true if the template has no intensity variation.
    pub fn is_flat(&self) -> bool {
        self.var_t == 0
    }
}

#[cfg(test)]
mod tests {
    use super::TemplatePlan;
    use crate::image::ImageView;

    #[test]
    fn statistics_match_direct_computation() {
        let data = [10u8, 20, 30, 40, 50, 60];
        let plan = TemplatePlan::from_view(ImageView::from_slice(&data, 3, 2).unwrap());
        assert_eq!(plan.len(), 6);
        assert_eq!(plan.sum_t(), 210);
        let sum_sq: u128 = data.iter().map(|&v| (v as u128) * (v as u128)).sum();
        assert_eq!(plan.var_t(), 6 * sum_sq - 210 * 210);
        assert_eq!(plan.row(1), &[40, 50, 60]);
        assert!(!plan.is_flat());
    }

    #[test]
    fn flat_template_has_zero_variance() {
        let data = [7u8; 12];
        let plan = TemplatePlan::from_view(ImageView::from_slice(&data, 4, 3).unwrap());
        assert!(plan.is_flat());
    }

    #[test]
    fn strided_view_skips_padding() {
        let data = [1u8, 2, 99, 3, 4, 99];
        let view = ImageView::new(&data, 2, 2, 3).unwrap();
        let plan = TemplatePlan::from_view(view);
        assert_eq!(plan.row(0), &[1, 2]);
        assert_eq!(plan.row(1), &[3, 4]);
        assert_eq!(plan.sum_t(), 10);
    }
}
