//! ClickMatch is a visual automation agent: it watches the screen for known
//! reference images and clicks the first one it finds.
//!
//! The crate is split into the matching engine (grayscale conversion,
//! zero-mean normalized cross-correlation, first-hit selection), a memoizing
//! template store, and a control loop that sequences capture, matching, and
//! clicking under a run/pause flag toggled from a hotkey thread. Platform
//! collaborators sit behind small traits; desktop implementations are
//! available with the `desktop` feature.

pub mod control;
pub mod image;
pub mod lowlevel;
#[cfg(feature = "desktop")]
pub mod platform;
pub mod search;
pub mod template;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use crate::control::actuator::{InputActuator, PointerDevice};
pub use crate::control::source::{
    DirTemplateSource, ScreenSource, StaticTemplateSource, TemplateSource,
};
pub use crate::control::state::{Hotkey, ParseHotkeyError, RunState, RunStatus, ToggleSignal};
pub use crate::control::{AgentConfig, ControlLoop, TickOutcome, DEFAULT_DELAY};
pub use crate::image::{ColorImage, ImageView, OwnedImage};
pub use crate::search::{MatchConfig, Matcher, Point, DEFAULT_THRESHOLD};
pub use crate::template::{Template, TemplateDecoder, TemplateStore};
pub use crate::util::{
    ActuationError, CaptureError, ClickMatchError, ClickMatchResult, EnumerateError,
    InvalidTemplateError, TemplateLoadError,
};
