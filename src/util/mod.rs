//! Shared utility helpers.

pub mod error;

pub use error::{
    ActuationError, CaptureError, ClickMatchError, ClickMatchResult, EnumerateError,
    InvalidTemplateError, TemplateLoadError,
};
