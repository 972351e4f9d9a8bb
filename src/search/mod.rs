//! Locating a template on a screen frame.
//!
//! The matcher converts both grids to grayscale with the same luminance
//! formula, scores every placement with zero-mean normalized
//! cross-correlation, and reports the first placement in row-major order whose
//! score reaches the threshold. When a template appears several times, the
//! topmost-leftmost occurrence is reported even if a later one scores higher.

mod fft;
pub(crate) mod scan;

use crate::image::gray::to_gray;
use crate::image::{ColorImage, ImageView};
use crate::template::{Template, TemplatePlan};
use crate::util::InvalidTemplateError;

/// Default minimum correlation for a window to count as a match.
pub const DEFAULT_THRESHOLD: f32 = 0.9;

/// Integer screen coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Matcher configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchConfig {
    /// Minimum score; windows scoring exactly this value qualify.
    pub threshold: f32,
    /// Scan rows in parallel (requires the `rayon` feature, ignored otherwise).
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            parallel: false,
        }
    }
}

/// Template matcher.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Matcher {
    /// Creates a matcher with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the matcher configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Finds `template` on `screen` and returns the center of the match.
    ///
    /// An empty template, or one without luminance variation, is an error. A
    /// template larger than the screen in either dimension, or one that
    /// appears nowhere, yields `Ok(None)`.
    pub fn find(
        &self,
        screen: &ColorImage,
        template: &ColorImage,
    ) -> Result<Option<Point>, InvalidTemplateError> {
        template.validate_template()?;
        let tpl_gray = to_gray(template).map_err(|_| InvalidTemplateError::Empty {
            width: template.width(),
            height: template.height(),
        })?;
        if screen.width() < template.width() || screen.height() < template.height() {
            return Ok(None);
        }
        let Ok(screen_gray) = to_gray(screen) else {
            return Ok(None);
        };
        self.find_in_gray(screen_gray.view(), tpl_gray.view())
    }

    /// Finds a stored template; see [`Matcher::find`].
    pub fn find_template(
        &self,
        screen: &ColorImage,
        template: &Template,
    ) -> Result<Option<Point>, InvalidTemplateError> {
        self.find(screen, template.pixels())
    }

    /// Grayscale core of [`Matcher::find`].
    pub fn find_in_gray(
        &self,
        screen: ImageView<'_, u8>,
        template: ImageView<'_, u8>,
    ) -> Result<Option<Point>, InvalidTemplateError> {
        let plan = TemplatePlan::from_view(template);
        if plan.is_flat() {
            return Err(InvalidTemplateError::Flat {
                width: plan.width(),
                height: plan.height(),
            });
        }
        Ok(self
            .scan(screen, &plan)
            .map(|(x, y)| center_of(x, y, plan.width(), plan.height())))
    }

    #[cfg(feature = "rayon")]
    fn scan(&self, screen: ImageView<'_, u8>, plan: &TemplatePlan) -> Option<(usize, usize)> {
        if self.cfg.parallel {
            scan::scan_first_par(screen, plan, self.cfg.threshold)
        } else {
            scan::scan_first(screen, plan, self.cfg.threshold)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn scan(&self, screen: ImageView<'_, u8>, plan: &TemplatePlan) -> Option<(usize, usize)> {
        scan::scan_first(screen, plan, self.cfg.threshold)
    }
}

/// Converts a top-left placement to the window center (truncating halves).
fn center_of(x: usize, y: usize, width: usize, height: usize) -> Point {
    Point::new((x + width / 2) as i32, (y + height / 2) as i32)
}
