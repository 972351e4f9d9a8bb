//! Desktop implementations of the loop's collaborators.
//!
//! Available when the `desktop` feature is enabled: screen capture through
//! `xcap`, pointer injection through `enigo`, and a global key listener
//! through `rdev`.

mod capture;
mod hotkey;
mod pointer;

pub use capture::PrimaryScreen;
pub use hotkey::spawn_hotkey_listener;
pub use pointer::EnigoPointer;
