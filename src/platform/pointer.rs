//! System pointer control.

use crate::control::actuator::PointerDevice;
use crate::search::Point;
use crate::util::ActuationError;
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

/// System pointer driven through `enigo`.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    /// Opens a connection to the platform input system.
    pub fn new() -> Result<Self, ActuationError> {
        let enigo = Enigo::new(&Settings::default()).map_err(|err| ActuationError::Unavailable {
            reason: err.to_string(),
        })?;
        Ok(Self { enigo })
    }
}

fn rejected(err: enigo::InputError) -> ActuationError {
    ActuationError::Rejected {
        reason: err.to_string(),
    }
}

impl PointerDevice for EnigoPointer {
    fn position(&mut self) -> Result<Point, ActuationError> {
        let (x, y) = self.enigo.location().map_err(rejected)?;
        Ok(Point::new(x, y))
    }

    fn move_to(&mut self, point: Point) -> Result<(), ActuationError> {
        self.enigo
            .move_mouse(point.x, point.y, Coordinate::Abs)
            .map_err(rejected)
    }

    fn click_primary(&mut self) -> Result<(), ActuationError> {
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(rejected)
    }
}
