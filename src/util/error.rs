//! Error types for clickmatch.
//!
//! Each collaborator fails with its own narrow error so the control loop can
//! apply a different recovery policy per kind. `ClickMatchError` wraps them
//! all for callers that only want to propagate.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for clickmatch operations.
pub type ClickMatchResult<T> = std::result::Result<T, ClickMatchError>;

/// A template file could not be turned into a pixel grid.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TemplateLoadError {
    /// Nothing exists at the path.
    #[error("template not found: {}", path.display())]
    NotFound { path: PathBuf },
    /// The file exists but could not be read.
    #[error("template unreadable: {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },
    /// The bytes were read but do not decode as an image.
    #[error("template corrupt: {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

impl TemplateLoadError {
    /// Returns the path the error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::NotFound { path } | Self::Unreadable { path, .. } | Self::Corrupt { path, .. } => {
                path
            }
        }
    }

    /// Returns true if the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the file exists but its content is not a valid image.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// A template cannot be matched because its pixel grid is unusable.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidTemplateError {
    /// Zero width or zero height; no window of that size exists.
    #[error("empty template: {width}x{height}")]
    Empty { width: usize, height: usize },
    /// Every pixel has the same luminance, so correlation is undefined.
    #[error("flat template: {width}x{height} has no luminance variation")]
    Flat { width: usize, height: usize },
}

/// The screen could not be captured.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// No display is attached or none could be enumerated.
    #[error("no display available for capture")]
    NoDisplay,
    /// The platform refused the capture (e.g. missing permission).
    #[error("screen capture denied: {reason}")]
    Denied { reason: String },
    /// Any other platform failure.
    #[error("screen capture failed: {reason}")]
    Failed { reason: String },
}

/// Synthetic input was rejected by the platform.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ActuationError {
    /// The input device could not be opened.
    #[error("input device unavailable: {reason}")]
    Unavailable { reason: String },
    /// A pointer query, move, or click was refused.
    #[error("input rejected: {reason}")]
    Rejected { reason: String },
}

/// The template directory could not be listed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EnumerateError {
    #[error("cannot list templates in {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },
}

/// Errors that can occur anywhere in clickmatch.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClickMatchError {
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A color buffer does not hold exactly `width * height * 3` bytes.
    #[error("color buffer length {got} does not match expected {expected}")]
    BufferLengthMismatch { expected: usize, got: usize },
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    TemplateLoad(#[from] TemplateLoadError),
    #[error(transparent)]
    InvalidTemplate(#[from] InvalidTemplateError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Actuation(#[from] ActuationError),
    #[error(transparent)]
    Enumerate(#[from] EnumerateError),
}
