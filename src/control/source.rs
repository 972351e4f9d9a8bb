//! Collaborators the control loop pulls from: screen frames and template paths.

use crate::image::ColorImage;
use crate::util::{CaptureError, EnumerateError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Captures the full screen as an RGB grid at native resolution.
///
/// Every call yields a fresh frame; blocking for the duration of the capture
/// is expected.
pub trait ScreenSource {
    fn capture(&mut self) -> Result<ColorImage, CaptureError>;
}

impl<S: ScreenSource + ?Sized> ScreenSource for Box<S> {
    fn capture(&mut self) -> Result<ColorImage, CaptureError> {
        (**self).capture()
    }
}

/// Lists template paths in the order they are tried.
pub trait TemplateSource {
    fn list(&self) -> Result<Vec<PathBuf>, EnumerateError>;
}

/// Fixed list of template paths, sorted on construction.
#[derive(Clone, Debug, Default)]
pub struct StaticTemplateSource {
    paths: Vec<PathBuf>,
}

impl StaticTemplateSource {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        paths.sort();
        Self { paths }
    }
}

impl TemplateSource for StaticTemplateSource {
    fn list(&self) -> Result<Vec<PathBuf>, EnumerateError> {
        Ok(self.paths.clone())
    }
}

/// Files directly inside a directory with a given extension.
///
/// The directory is re-read on every call so templates can be added or
/// removed while the agent runs. Extension comparison ignores ASCII case.
#[derive(Clone, Debug)]
pub struct DirTemplateSource {
    dir: PathBuf,
    extension: String,
}

impl DirTemplateSource {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Returns the scanned directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

impl TemplateSource for DirTemplateSource {
    fn list(&self) -> Result<Vec<PathBuf>, EnumerateError> {
        let unreadable = |reason: String| EnumerateError::Unreadable {
            path: self.dir.clone(),
            reason,
        };
        if !self.dir.is_dir() {
            return Err(unreadable("not a directory".to_string()));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|err| unreadable(err.to_string()))?;
            if entry.file_type().is_file() && self.matches_extension(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Ok(paths)
    }
}
