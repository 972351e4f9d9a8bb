//! Global toggle key listener.

use crate::control::state::{Hotkey, ToggleSignal};
use rdev::{EventType, Key};
use std::io;
use std::thread::{self, JoinHandle};

fn to_rdev(key: Hotkey) -> Option<Key> {
    let key = match key {
        Hotkey::F(1) => Key::F1,
        Hotkey::F(2) => Key::F2,
        Hotkey::F(3) => Key::F3,
        Hotkey::F(4) => Key::F4,
        Hotkey::F(5) => Key::F5,
        Hotkey::F(6) => Key::F6,
        Hotkey::F(7) => Key::F7,
        Hotkey::F(8) => Key::F8,
        Hotkey::F(9) => Key::F9,
        Hotkey::F(10) => Key::F10,
        Hotkey::F(11) => Key::F11,
        Hotkey::F(12) => Key::F12,
        Hotkey::F(_) => return None,
        Hotkey::Pause => Key::Pause,
        Hotkey::ScrollLock => Key::ScrollLock,
        Hotkey::Escape => Key::Escape,
    };
    Some(key)
}

/// Starts a background thread that flips `signal` on every press of `key`.
///
/// The thread only touches the run flag; it never captures or clicks. Key
/// releases are ignored.
pub fn spawn_hotkey_listener(key: Hotkey, signal: ToggleSignal) -> io::Result<JoinHandle<()>> {
    let target = to_rdev(key).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("unsupported hotkey {key}"))
    })?;
    thread::Builder::new()
        .name("hotkey".to_string())
        .spawn(move || {
            let result = rdev::listen(move |event| {
                if let EventType::KeyPress(pressed) = event.event_type {
                    if pressed == target {
                        signal.press();
                    }
                }
            });
            if let Err(err) = result {
                tracing::error!(error = ?err, "hotkey listener stopped");
            }
        })
}
