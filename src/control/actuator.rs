//! Synthetic clicks that leave the pointer where the user had it.

use crate::search::Point;
use crate::util::ActuationError;

/// Low-level pointer primitives supplied by the platform.
pub trait PointerDevice {
    fn position(&mut self) -> Result<Point, ActuationError>;
    fn move_to(&mut self, point: Point) -> Result<(), ActuationError>;
    fn click_primary(&mut self) -> Result<(), ActuationError>;
}

impl<P: PointerDevice + ?Sized> PointerDevice for Box<P> {
    fn position(&mut self) -> Result<Point, ActuationError> {
        (**self).position()
    }

    fn move_to(&mut self, point: Point) -> Result<(), ActuationError> {
        (**self).move_to(point)
    }

    fn click_primary(&mut self) -> Result<(), ActuationError> {
        (**self).click_primary()
    }
}

/// Clicks at a point, then puts the pointer back.
pub struct InputActuator<P> {
    device: P,
}

impl<P: PointerDevice> InputActuator<P> {
    pub fn new(device: P) -> Self {
        Self { device }
    }

    /// Moves to `point`, clicks the primary button, and restores the pointer.
    ///
    /// Restoration is attempted whenever the original position could be read,
    /// even if the move or click failed. The first error encountered is
    /// returned.
    pub fn click_at(&mut self, point: Point) -> Result<(), ActuationError> {
        let saved = self.device.position()?;
        let clicked = self
            .device
            .move_to(point)
            .and_then(|()| self.device.click_primary());
        let restored = self.device.move_to(saved);
        if let Err(err) = &restored {
            tracing::warn!(error = %err, x = saved.x, y = saved.y, "pointer restore failed");
        }
        clicked.and(restored)
    }

    /// Returns the underlying device.
    pub fn device(&self) -> &P {
        &self.device
    }

    /// Returns the underlying device mutably.
    pub fn device_mut(&mut self) -> &mut P {
        &mut self.device
    }
}
