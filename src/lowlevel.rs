//! Low-level building blocks behind [`Matcher`](crate::Matcher).
//!
//! Exposes the grayscale conversion, integral tables, template plans, and
//! per-placement scoring for callers that want to inspect scores directly,
//! e.g. to calibrate a confidence threshold.

pub use crate::image::gray::{luma, to_gray};
pub use crate::image::integral::IntegralTables;
pub use crate::search::scan::{scan_first, score_at};
pub use crate::template::TemplatePlan;
