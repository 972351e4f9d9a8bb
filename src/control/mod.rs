//! The scan-and-click control loop.
//!
//! One tick lists the template paths, then for each path in order loads the
//! template, captures a fresh screen, and runs the matcher. The first match is
//! clicked and ends the tick. The run flag is re-read before every template so
//! a pause takes effect mid-scan.
//!
//! Failure policy per tick:
//! - a template that fails to load or is unusable is skipped for the rest of
//!   the run;
//! - a capture failure abandons the remainder of the tick;
//! - a click failure is logged and still ends the tick.
//!
//! There is no retry beyond the next tick and no timeout on capture or decode.

pub mod actuator;
pub mod source;
pub mod state;

use crate::search::{MatchConfig, Matcher, Point, DEFAULT_THRESHOLD};
use crate::template::{TemplateDecoder, TemplateStore};
use crate::util::{ActuationError, ClickMatchError, ClickMatchResult, EnumerateError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use actuator::{InputActuator, PointerDevice};
use source::{ScreenSource, TemplateSource};
use state::{Hotkey, RunState};

/// Default pause between the end of one tick and the start of the next.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Agent settings. How they are sourced (file, flags) is up to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentConfig {
    /// Directory scanned for templates every tick.
    pub images_dir: PathBuf,
    /// File extension of template files, without the dot.
    pub extension: String,
    /// Fixed delay after each tick's work.
    pub delay: Duration,
    /// Minimum correlation score for a match.
    pub confidence: f32,
    /// Key that toggles running/paused.
    pub toggle_key: Hotkey,
    /// Row-parallel matching (only with the `rayon` feature).
    pub parallel: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("images"),
            extension: "png".to_string(),
            delay: DEFAULT_DELAY,
            confidence: DEFAULT_THRESHOLD,
            toggle_key: Hotkey::default(),
            parallel: false,
        }
    }
}

impl AgentConfig {
    /// Rejects values the loop cannot run with.
    pub fn validate(&self) -> ClickMatchResult<()> {
        if !(self.confidence > 0.0 && self.confidence <= 1.0) {
            return Err(ClickMatchError::InvalidConfig(format!(
                "confidence must be in (0, 1], got {}",
                self.confidence
            )));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ClickMatchError::InvalidConfig(
                "extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Matcher settings derived from this config.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            threshold: self.confidence,
            parallel: self.parallel,
        }
    }
}

/// What a single tick did.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// The agent was paused when the tick started.
    Paused,
    /// A template matched and the click succeeded.
    Clicked { path: PathBuf, point: Point },
    /// A template matched but the click was rejected.
    ClickFailed {
        path: PathBuf,
        point: Point,
        error: ActuationError,
    },
    /// Every usable template was checked without a match.
    NoMatch { checked: usize },
    /// The agent was paused part way through the templates.
    Interrupted { checked: usize },
    /// The screen could not be captured; the rest of the tick was skipped.
    CaptureFailed,
    /// The template directory could not be listed.
    EnumerateFailed,
}

/// Scan-and-click loop over injected collaborators.
pub struct ControlLoop<S, P, D, T> {
    screen: S,
    actuator: InputActuator<P>,
    store: TemplateStore<D>,
    templates: T,
    matcher: Matcher,
    state: RunState,
    delay: Duration,
    skipped: HashSet<PathBuf>,
    liveness: Box<dyn Write + Send>,
    line_open: bool,
    last_enumerate_error: Option<EnumerateError>,
}

impl<S, P, D, T> ControlLoop<S, P, D, T>
where
    S: ScreenSource,
    P: PointerDevice,
    D: TemplateDecoder,
    T: TemplateSource,
{
    /// Creates a loop with the default matcher and delay and no liveness output.
    pub fn new(screen: S, pointer: P, decoder: D, templates: T, state: RunState) -> Self {
        Self {
            screen,
            actuator: InputActuator::new(pointer),
            store: TemplateStore::new(decoder),
            templates,
            matcher: Matcher::new(),
            state,
            delay: DEFAULT_DELAY,
            skipped: HashSet::new(),
            liveness: Box::new(io::sink()),
            line_open: false,
            last_enumerate_error: None,
        }
    }

    /// Replaces the matcher.
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Sets the delay slept after every tick.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets where the per-check liveness dots are written.
    pub fn with_liveness(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.liveness = sink;
        self
    }

    /// Returns the shared run state.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Returns the template store.
    pub fn store(&self) -> &TemplateStore<D> {
        &self.store
    }

    /// Returns the pointer device behind the actuator.
    pub fn pointer(&self) -> &P {
        self.actuator.device()
    }

    /// Returns the screen source.
    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Returns true if `path` has been dropped for the rest of the run.
    pub fn is_skipped(&self, path: &Path) -> bool {
        self.skipped.contains(path)
    }

    /// Runs ticks forever, sleeping the fixed delay after each one.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
            thread::sleep(self.delay);
        }
    }

    /// Runs ticks until `keep_going` returns false for an outcome.
    ///
    /// Returns the number of ticks performed.
    pub fn run_while(&mut self, mut keep_going: impl FnMut(&TickOutcome) -> bool) -> usize {
        let mut ticks = 0;
        loop {
            let outcome = self.tick();
            ticks += 1;
            if !keep_going(&outcome) {
                return ticks;
            }
            thread::sleep(self.delay);
        }
    }

    /// Performs one tick of work.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Paused;
        }
        let _span = tracing::debug_span!("tick").entered();

        let paths = match self.templates.list() {
            Ok(paths) => {
                self.last_enumerate_error = None;
                paths
            }
            Err(err) => {
                if self.last_enumerate_error.as_ref() != Some(&err) {
                    self.break_line();
                    tracing::warn!(error = %err, "template listing failed");
                    self.last_enumerate_error = Some(err);
                }
                return TickOutcome::EnumerateFailed;
            }
        };

        let mut checked = 0;
        for path in paths {
            if !self.state.is_running() {
                tracing::debug!(checked, "paused mid-scan");
                return TickOutcome::Interrupted { checked };
            }
            if self.skipped.contains(&path) {
                continue;
            }

            let template = match self.store.load(&path) {
                Ok(template) => template,
                Err(err) => {
                    self.break_line();
                    tracing::warn!(path = %path.display(), error = %err, "skipping template");
                    self.skipped.insert(path);
                    continue;
                }
            };

            let screen = match self.screen.capture() {
                Ok(screen) => screen,
                Err(err) => {
                    self.break_line();
                    tracing::error!(error = %err, "screen capture failed");
                    return TickOutcome::CaptureFailed;
                }
            };

            checked += 1;
            match self.matcher.find_template(&screen, &template) {
                Ok(Some(point)) => return self.click(path, point),
                Ok(None) => self.beat(),
                Err(err) => {
                    self.break_line();
                    tracing::warn!(path = %path.display(), error = %err, "skipping template");
                    self.skipped.insert(path);
                }
            }
        }

        TickOutcome::NoMatch { checked }
    }

    fn click(&mut self, path: PathBuf, point: Point) -> TickOutcome {
        self.break_line();
        match self.actuator.click_at(point) {
            Ok(()) => {
                tracing::info!("Clicked on {} at {}", path.display(), point);
                TickOutcome::Clicked { path, point }
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    x = point.x,
                    y = point.y,
                    error = %error,
                    "click failed"
                );
                TickOutcome::ClickFailed { path, point, error }
            }
        }
    }

    /// One liveness dot for a template checked without a match.
    fn beat(&mut self) {
        let _ = self.liveness.write_all(b".");
        let _ = self.liveness.flush();
        self.line_open = true;
    }

    /// Ends a run of dots so the next log line starts on its own line.
    fn break_line(&mut self) {
        if self.line_open {
            let _ = self.liveness.write_all(b"\n");
            let _ = self.liveness.flush();
            self.line_open = false;
        }
    }
}
