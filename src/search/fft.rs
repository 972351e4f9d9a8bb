//! Cross-correlation of a screen with a zero-mean template via FFT.
//!
//! The screen is flattened row-major with its own width as the row stride and
//! the template is laid out on the same stride, so one 1D circular
//! correlation yields the 2D correlation at every valid top-left placement.
//! Valid placements never read past the last screen pixel, so the padding
//! length only has to cover the screen itself.

use crate::image::ImageView;
use crate::template::TemplatePlan;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// `sum((T - mean(T)) * I)` for every placement, indexed `y * width + x`.
pub struct CorrelationField {
    values: Vec<f64>,
    width: usize,
    error_bound: f64,
}

impl CorrelationField {
    /// Computes the field for `tpl` over `image`.
    ///
    /// The template must fit inside the image.
    pub fn compute(image: ImageView<'_, u8>, tpl: &TemplatePlan) -> Self {
        let width = image.width();
        let height = image.height();
        let len = (width * height).next_power_of_two();

        let mut image_freq = vec![Complex::new(0.0, 0.0); len];
        let mut image_energy = 0.0f64;
        for y in 0..height {
            let Some(row) = image.row(y) else {
                break;
            };
            for (x, &value) in row.iter().enumerate() {
                let v = value as f64;
                image_energy += v * v;
                image_freq[y * width + x] = Complex::new(v, 0.0);
            }
        }

        let mean_t = tpl.sum_t() as f64 / tpl.len() as f64;
        let mut tpl_freq = vec![Complex::new(0.0, 0.0); len];
        let mut tpl_energy = 0.0f64;
        for ty in 0..tpl.height() {
            for (tx, &value) in tpl.row(ty).iter().enumerate() {
                let d = value as f64 - mean_t;
                tpl_energy += d * d;
                tpl_freq[ty * width + tx] = Complex::new(d, 0.0);
            }
        }

        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(len);
        forward.process(&mut image_freq);
        forward.process(&mut tpl_freq);
        for (i, t) in image_freq.iter_mut().zip(&tpl_freq) {
            *i *= t.conj();
        }
        drop(tpl_freq);
        planner.plan_fft_inverse(len).process(&mut image_freq);

        let scale = 1.0 / len as f64;
        let values = image_freq
            .iter()
            .take(width * height)
            .map(|c| c.re * scale)
            .collect();

        // Round-off of an FFT correlation grows with log2(len) times the two
        // signal norms; the factor keeps several orders of magnitude of slack.
        let error_bound = 1e-11 * (len.trailing_zeros().max(1) as f64)
            * image_energy.sqrt()
            * tpl_energy.sqrt();

        Self {
            values,
            width,
            error_bound,
        }
    }

    /// Returns the correlation at top-left `(x, y)`.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    /// Upper bound on the absolute error of any value in the field.
    pub fn error_bound(&self) -> f64 {
        self.error_bound
    }
}
