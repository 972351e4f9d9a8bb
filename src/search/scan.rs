//! Dense zero-mean normalized cross-correlation over every placement.
//!
//! Scores follow TM_CCOEFF_NORMED:
//!
//! ```text
//! num = N * sum(T * I) - sum(T) * sum(I)
//! den = sqrt((N * sum(T^2) - sum(T)^2) * (N * sum(I^2) - sum(I)^2))
//! ```
//!
//! All sums are exact integers; only the final division is floating point, so
//! a score is reproducible bit-for-bit for the same inputs. A zero variance on
//! either side scores 0.
//!
//! Scans prefilter placements with an FFT correlation field and rescore the
//! survivors exactly, so a full-screen scan costs a few FFTs rather than one
//! dot product per placement.

use crate::image::integral::IntegralTables;
use crate::image::ImageView;
use crate::search::fft::CorrelationField;
use crate::template::TemplatePlan;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Scores the template placed with its top-left corner at `(x, y)`.
///
/// Returns `f32::NEG_INFINITY` if the placement does not fit in the image.
pub fn score_at(
    image: ImageView<'_, u8>,
    tables: &IntegralTables,
    tpl: &TemplatePlan,
    x: usize,
    y: usize,
) -> f32 {
    let tpl_width = tpl.width();
    let tpl_height = tpl.height();
    if image.width() < tpl_width || image.height() < tpl_height {
        return f32::NEG_INFINITY;
    }
    if x > image.width() - tpl_width || y > image.height() - tpl_height {
        return f32::NEG_INFINITY;
    }
    if tpl.is_flat() {
        return 0.0;
    }

    let (sum_i, sum_i2) = tables.window(x, y, tpl_width, tpl_height);
    let n = tpl.len() as u128;
    let var_i = n * sum_i2 as u128 - (sum_i as u128) * (sum_i as u128);
    if var_i == 0 {
        return 0.0;
    }

    let mut dot = 0u64;
    for ty in 0..tpl_height {
        let Some(img_row) = image.row(y + ty) else {
            return f32::NEG_INFINITY;
        };
        let img_row = &img_row[x..x + tpl_width];
        let tpl_row = tpl.row(ty);
        dot += img_row
            .iter()
            .zip(tpl_row)
            .map(|(&i, &t)| i as u64 * t as u64)
            .sum::<u64>();
    }

    let num = (n * dot as u128) as i128 - (tpl.sum_t() as u128 * sum_i as u128) as i128;
    let den = (tpl.var_t() as f64).sqrt() * (var_i as f64).sqrt();
    let score = (num as f64 / den).clamp(-1.0, 1.0);
    score as f32
}

/// Returns the first placement in row-major order scoring at least `threshold`.
///
/// Rows are visited top to bottom and columns left to right; the first
/// qualifying window wins even if a later one scores higher.
pub fn scan_first(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    threshold: f32,
) -> Option<(usize, usize)> {
    let scan = Scan::prepare(image, tpl)?;
    (0..=scan.max_y).find_map(|y| scan.first_in_row(y, threshold).map(|x| (x, y)))
}

/// Row-parallel `scan_first` with the same row-major result.
#[cfg(feature = "rayon")]
pub fn scan_first_par(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    threshold: f32,
) -> Option<(usize, usize)> {
    let scan = Scan::prepare(image, tpl)?;
    (0..=scan.max_y)
        .into_par_iter()
        .find_map_first(|y| scan.first_in_row(y, threshold).map(|x| (x, y)))
}

/// Covers the f64 to f32 rounding of exact scores near the threshold.
const ROUNDING_SLACK: f64 = 1e-6;

/// Per-call state shared by every row of a scan.
///
/// The FFT field gives an approximate score for each placement in O(1). Only
/// placements whose score could reach the threshold within the field's error
/// bound are rescored exactly with `score_at`, so results are identical to an
/// exhaustive exact scan.
struct Scan<'a> {
    image: ImageView<'a, u8>,
    tpl: &'a TemplatePlan,
    tables: IntegralTables,
    field: Option<CorrelationField>,
    max_x: usize,
    max_y: usize,
}

impl<'a> Scan<'a> {
    fn prepare(image: ImageView<'a, u8>, tpl: &'a TemplatePlan) -> Option<Self> {
        if tpl.is_empty() || image.width() < tpl.width() || image.height() < tpl.height() {
            return None;
        }
        let field = (!tpl.is_flat()).then(|| CorrelationField::compute(image, tpl));
        Some(Self {
            image,
            tpl,
            tables: IntegralTables::from_view(image),
            field,
            max_x: image.width() - tpl.width(),
            max_y: image.height() - tpl.height(),
        })
    }

    fn first_in_row(&self, y: usize, threshold: f32) -> Option<usize> {
        (0..=self.max_x).find(|&x| {
            self.may_reach(x, y, threshold)
                && score_at(self.image, &self.tables, self.tpl, x, y) >= threshold
        })
    }

    /// False only when the exact score at `(x, y)` is certainly below `threshold`.
    fn may_reach(&self, x: usize, y: usize, threshold: f32) -> bool {
        let Some(field) = &self.field else {
            return 0.0 >= threshold;
        };
        let (sum_i, sum_i2) = self.tables.window(x, y, self.tpl.width(), self.tpl.height());
        let n = self.tpl.len() as u128;
        let var_i = n * sum_i2 as u128 - (sum_i as u128) * (sum_i as u128);
        if var_i == 0 {
            return 0.0 >= threshold;
        }
        let n = n as f64;
        let den = (self.tpl.var_t() as f64 / n).sqrt() * (var_i as f64 / n).sqrt();
        let upper = (field.at(x, y) + field.error_bound()) / den;
        // The exact score is rounded to f32 before the comparison.
        upper >= threshold as f64 - ROUNDING_SLACK
    }
}
