//! Memoizing template store keyed by path.

use crate::image::ColorImage;
use crate::template::Template;
use crate::util::TemplateLoadError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Turns a template path into a color pixel grid.
pub trait TemplateDecoder {
    fn decode(&self, path: &Path) -> Result<ColorImage, TemplateLoadError>;
}

impl<F> TemplateDecoder for F
where
    F: Fn(&Path) -> Result<ColorImage, TemplateLoadError>,
{
    fn decode(&self, path: &Path) -> Result<ColorImage, TemplateLoadError> {
        self(path)
    }
}

/// Unbounded cache of decoded templates.
///
/// A path is decoded at most once per successful load; later lookups return
/// the same shared `Template`. Failed decodes are not cached, so callers that
/// want to stop retrying a bad path must remember it themselves.
pub struct TemplateStore<D> {
    decoder: D,
    cache: HashMap<PathBuf, Arc<Template>>,
    decodes: usize,
}

impl<D: TemplateDecoder> TemplateStore<D> {
    /// Creates an empty store backed by `decoder`.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            cache: HashMap::new(),
            decodes: 0,
        }
    }

    /// Returns the template for `path`, decoding it on first request.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Template>, TemplateLoadError> {
        if let Some(tpl) = self.cache.get(path) {
            return Ok(Arc::clone(tpl));
        }

        self.decodes += 1;
        let pixels = self.decoder.decode(path)?;
        tracing::debug!(
            path = %path.display(),
            width = pixels.width(),
            height = pixels.height(),
            "template decoded"
        );
        let tpl = Arc::new(Template::new(path, pixels));
        self.cache.insert(path.to_path_buf(), Arc::clone(&tpl));
        Ok(tpl)
    }

    /// Returns true if `path` is already resident.
    pub fn contains(&self, path: &Path) -> bool {
        self.cache.contains_key(path)
    }

    /// Returns the number of resident templates.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Returns how many times the decoder has been invoked.
    pub fn decode_count(&self) -> usize {
        self.decodes
    }
}
