//! Templates, their matching plans, and the memoizing store.

use crate::image::ColorImage;
use std::path::{Path, PathBuf};

mod plan;
mod store;

pub use plan::TemplatePlan;
pub use store::{TemplateDecoder, TemplateStore};

/// A reference image identified by the path it was loaded from.
///
/// Immutable once created; the store hands out shared handles.
#[derive(Debug, PartialEq, Eq)]
pub struct Template {
    path: PathBuf,
    pixels: ColorImage,
}

impl Template {
    /// Creates a template from a decoded color grid.
    pub fn new(path: impl Into<PathBuf>, pixels: ColorImage) -> Self {
        Self {
            path: path.into(),
            pixels,
        }
    }

    /// Returns the source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the decoded color payload.
    pub fn pixels(&self) -> &ColorImage {
        &self.pixels
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.pixels.height()
    }
}
