//! Run/pause flag shared between the hotkey listener and the control loop.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether ticks perform scanning work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Paused,
}

impl RunStatus {
    fn from_flag(running: bool) -> Self {
        if running {
            Self::Running
        } else {
            Self::Paused
        }
    }
}

/// Process-wide run flag, initially running.
///
/// Cloning yields another handle to the same flag. Writes use release
/// ordering and reads acquire, so a flip on the listener thread is visible to
/// the next read on the loop thread.
#[derive(Clone, Debug)]
pub struct RunState {
    running: Arc<AtomicBool>,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    /// Creates a flag in the `Running` state.
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns the current status.
    pub fn read(&self) -> RunStatus {
        RunStatus::from_flag(self.is_running())
    }

    /// Returns true while running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Flips the flag once and returns the new status.
    pub fn toggle(&self) -> RunStatus {
        let was_running = self.running.fetch_xor(true, Ordering::AcqRel);
        RunStatus::from_flag(!was_running)
    }
}

/// Handler for hotkey presses; each delivered press flips the run state once.
///
/// There is no debouncing: OS auto-repeat produces one flip per repeated
/// press event.
#[derive(Clone, Debug)]
pub struct ToggleSignal {
    state: RunState,
}

impl ToggleSignal {
    pub fn new(state: RunState) -> Self {
        Self { state }
    }

    /// Reacts to one press of the configured key.
    pub fn press(&self) -> RunStatus {
        let status = self.state.toggle();
        match status {
            RunStatus::Running => tracing::info!("Agent started."),
            RunStatus::Paused => tracing::info!("Agent stopped."),
        }
        status
    }

    /// Returns the state this signal flips.
    pub fn state(&self) -> &RunState {
        &self.state
    }
}

/// Keys accepted as the toggle hotkey.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hotkey {
    F(u8),
    Pause,
    ScrollLock,
    Escape,
}

impl Default for Hotkey {
    fn default() -> Self {
        Self::F(2)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::F(n) => write!(f, "F{n}"),
            Self::Pause => f.write_str("Pause"),
            Self::ScrollLock => f.write_str("ScrollLock"),
            Self::Escape => f.write_str("Escape"),
        }
    }
}

/// The key name is not one of the accepted toggle keys.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
#[error("unsupported toggle key: {0:?} (expected F1-F12, Pause, ScrollLock or Escape)")]
pub struct ParseHotkeyError(pub String);

impl FromStr for Hotkey {
    type Err = ParseHotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "pause" => return Ok(Self::Pause),
            "scrolllock" | "scroll_lock" => return Ok(Self::ScrollLock),
            "escape" | "esc" => return Ok(Self::Escape),
            _ => {}
        }
        name.strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(Self::F)
            .ok_or_else(|| ParseHotkeyError(s.to_string()))
    }
}
