//! Summed-area tables for O(1) window statistics.

use crate::image::ImageView;

/// Integral images of intensity and squared intensity.
///
/// Both tables have one extra leading row and column of zeros, so the sum over
/// `[x, x + w) x [y, y + h)` reads four corners without bounds special cases.
pub struct IntegralTables {
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
    stride: usize,
}

impl IntegralTables {
    /// Builds both tables from a grayscale view.
    pub fn from_view(image: ImageView<'_, u8>) -> Self {
        let width = image.width();
        let height = image.height();
        let stride = width + 1;
        let mut sum = vec![0u64; stride * (height + 1)];
        let mut sum_sq = vec![0u64; stride * (height + 1)];

        for y in 0..height {
            let Some(row) = image.row(y) else {
                break;
            };
            let mut row_sum = 0u64;
            let mut row_sum_sq = 0u64;
            for (x, &value) in row.iter().enumerate() {
                let v = value as u64;
                row_sum += v;
                row_sum_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = sum[idx - stride] + row_sum;
                sum_sq[idx] = sum_sq[idx - stride] + row_sum_sq;
            }
        }

        Self {
            sum,
            sum_sq,
            stride,
        }
    }

    /// Returns `(sum, sum_of_squares)` over the window with top-left `(x, y)`.
    ///
    /// The window must lie within the source image.
    #[inline]
    pub fn window(&self, x: usize, y: usize, width: usize, height: usize) -> (u64, u64) {
        let s = self.stride;
        let a = y * s + x;
        let b = y * s + x + width;
        let c = (y + height) * s + x;
        let d = (y + height) * s + x + width;
        (
            self.sum[d] + self.sum[a] - self.sum[b] - self.sum[c],
            self.sum_sq[d] + self.sum_sq[a] - self.sum_sq[b] - self.sum_sq[c],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::IntegralTables;
    use crate::image::ImageView;

    #[test]
    fn window_sums_match_bruteforce() {
        let width = 7;
        let height = 5;
        let data: Vec<u8> = (0..width * height)
            .map(|i| ((i * 37 + 11) % 251) as u8)
            .collect();
        let view = ImageView::from_slice(&data, width, height).unwrap();
        let tables = IntegralTables::from_view(view);

        for (x, y, w, h) in [(0, 0, 7, 5), (2, 1, 3, 3), (6, 4, 1, 1), (0, 3, 4, 2)] {
            let mut sum = 0u64;
            let mut sum_sq = 0u64;
            for yy in y..y + h {
                for xx in x..x + w {
                    let v = data[yy * width + xx] as u64;
                    sum += v;
                    sum_sq += v * v;
                }
            }
            assert_eq!(tables.window(x, y, w, h), (sum, sum_sq));
        }
    }
}
