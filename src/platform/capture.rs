//! Primary-monitor screen capture.

use crate::control::source::ScreenSource;
use crate::image::io::color_from_rgba_image;
use crate::image::ColorImage;
use crate::util::CaptureError;
use xcap::Monitor;

/// Captures the primary monitor (or the first one reported).
///
/// Monitors are re-enumerated on every capture so hot-plugging is picked up.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrimaryScreen;

impl PrimaryScreen {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenSource for PrimaryScreen {
    fn capture(&mut self) -> Result<ColorImage, CaptureError> {
        let monitors = Monitor::all().map_err(|err| classify(err.to_string()))?;
        let monitor = monitors
            .iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .ok_or(CaptureError::NoDisplay)?;
        let frame = monitor
            .capture_image()
            .map_err(|err| classify(err.to_string()))?;
        color_from_rgba_image(&frame).map_err(|err| CaptureError::Failed {
            reason: err.to_string(),
        })
    }
}

fn classify(reason: String) -> CaptureError {
    let lower = reason.to_ascii_lowercase();
    if lower.contains("permission") || lower.contains("denied") {
        CaptureError::Denied { reason }
    } else {
        CaptureError::Failed { reason }
    }
}
