//! Decoding template files via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::ColorImage;
use crate::template::TemplateDecoder;
use crate::util::{ClickMatchResult, TemplateLoadError};
use std::io::ErrorKind;
use std::path::Path;

/// Creates an owned color grid from an RGB buffer.
pub fn color_from_rgb_image(img: &image::RgbImage) -> ClickMatchResult<ColorImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ColorImage::new(img.as_raw().clone(), width, height)
}

/// Creates an owned color grid from an RGBA buffer, dropping alpha.
pub fn color_from_rgba_image(img: &image::RgbaImage) -> ClickMatchResult<ColorImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ColorImage::from_rgba(img.as_raw(), width, height)
}

/// Loads an image from disk as an RGB grid, classifying failures.
pub fn load_color_image<P: AsRef<Path>>(path: P) -> Result<ColorImage, TemplateLoadError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| classify(path, err))?;
    color_from_rgb_image(&img.to_rgb8()).map_err(|err| TemplateLoadError::Corrupt {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

fn classify(path: &Path, err: image::ImageError) -> TemplateLoadError {
    let path = path.to_path_buf();
    match err {
        image::ImageError::IoError(io) if io.kind() == ErrorKind::NotFound => {
            TemplateLoadError::NotFound { path }
        }
        image::ImageError::IoError(io) => TemplateLoadError::Unreadable {
            path,
            reason: io.to_string(),
        },
        other => TemplateLoadError::Corrupt {
            path,
            reason: other.to_string(),
        },
    }
}

/// Decodes templates straight from the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileDecoder;

impl TemplateDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<ColorImage, TemplateLoadError> {
        load_color_image(path)
    }
}
