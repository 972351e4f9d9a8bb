use clickmatch::{
    ActuationError, CaptureError, ColorImage, ControlLoop, EnumerateError, PointerDevice, Point,
    RunState, ScreenSource, StaticTemplateSource, TemplateDecoder, TemplateLoadError,
    TemplateSource, TickOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn noise(width: usize, height: usize, seed: u64) -> ColorImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height * 3)
        .map(|_| rng.random_range(0..=255u8))
        .collect();
    ColorImage::new(data, width, height).unwrap()
}

struct FakeScreen {
    frame: Option<ColorImage>,
    captures: usize,
    pause_on_capture: Option<RunState>,
}

impl FakeScreen {
    fn showing(frame: ColorImage) -> Self {
        Self {
            frame: Some(frame),
            captures: 0,
            pause_on_capture: None,
        }
    }

    fn broken() -> Self {
        Self {
            frame: None,
            captures: 0,
            pause_on_capture: None,
        }
    }
}

impl ScreenSource for FakeScreen {
    fn capture(&mut self) -> Result<ColorImage, CaptureError> {
        self.captures += 1;
        if let Some(state) = self.pause_on_capture.take() {
            state.toggle();
        }
        self.frame.clone().ok_or(CaptureError::NoDisplay)
    }
}

#[derive(Default)]
struct FakePointer {
    at: Point,
    clicks: Vec<Point>,
    refuse_clicks: bool,
}

impl PointerDevice for FakePointer {
    fn position(&mut self) -> Result<Point, ActuationError> {
        Ok(self.at)
    }

    fn move_to(&mut self, point: Point) -> Result<(), ActuationError> {
        self.at = point;
        Ok(())
    }

    fn click_primary(&mut self) -> Result<(), ActuationError> {
        if self.refuse_clicks {
            return Err(ActuationError::Rejected {
                reason: "input blocked".into(),
            });
        }
        self.clicks.push(self.at);
        Ok(())
    }
}

struct MapDecoder {
    files: HashMap<PathBuf, Result<ColorImage, TemplateLoadError>>,
}

impl TemplateDecoder for MapDecoder {
    fn decode(&self, path: &Path) -> Result<ColorImage, TemplateLoadError> {
        self.files.get(path).cloned().unwrap_or_else(|| {
            Err(TemplateLoadError::NotFound {
                path: path.to_path_buf(),
            })
        })
    }
}

struct FailingSource;

impl TemplateSource for FailingSource {
    fn list(&self) -> Result<Vec<PathBuf>, EnumerateError> {
        Err(EnumerateError::Unreadable {
            path: PathBuf::from("images"),
            reason: "permission denied".into(),
        })
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Screen with `b` at (100, 50); `a` is absent unless `show_a` is set.
struct Scene {
    screen: ColorImage,
    a: ColorImage,
    b: ColorImage,
}

impl Scene {
    fn new(show_a: bool) -> Self {
        let a = noise(32, 32, 2);
        let b = noise(16, 16, 3);
        let mut screen = noise(200, 120, 1);
        screen.blit(&b, 100, 50);
        if show_a {
            screen.blit(&a, 10, 10);
        }
        Self { screen, a, b }
    }

    fn decoder(&self, extra: Vec<(&str, Result<ColorImage, TemplateLoadError>)>) -> MapDecoder {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("images/a.png"), Ok(self.a.clone()));
        files.insert(PathBuf::from("images/b.png"), Ok(self.b.clone()));
        for (path, entry) in extra {
            files.insert(PathBuf::from(path), entry);
        }
        MapDecoder { files }
    }
}

type TestLoop = ControlLoop<FakeScreen, FakePointer, MapDecoder, StaticTemplateSource>;

fn agent(scene: &Scene, screen: FakeScreen, state: RunState) -> TestLoop {
    ControlLoop::new(
        screen,
        FakePointer {
            at: Point::new(3, 4),
            ..Default::default()
        },
        scene.decoder(Vec::new()),
        StaticTemplateSource::new(["images/b.png", "images/a.png"]),
        state,
    )
    .with_delay(Duration::ZERO)
}

#[test]
fn clicks_the_matching_template_and_restores_pointer() {
    let scene = Scene::new(false);
    let mut agent = agent(&scene, FakeScreen::showing(scene.screen.clone()), RunState::new());

    let outcome = agent.tick();
    assert_eq!(
        outcome,
        TickOutcome::Clicked {
            path: PathBuf::from("images/b.png"),
            point: Point::new(108, 58),
        }
    );
    assert_eq!(agent.pointer().clicks, vec![Point::new(108, 58)]);
    assert_eq!(agent.pointer().at, Point::new(3, 4));
    // One fresh capture per template checked.
    assert_eq!(agent.screen().captures, 2);
}

#[test]
fn earlier_template_wins_and_only_one_click_per_tick() {
    let scene = Scene::new(true);
    let mut agent = agent(&scene, FakeScreen::showing(scene.screen.clone()), RunState::new());

    let outcome = agent.tick();
    assert_eq!(
        outcome,
        TickOutcome::Clicked {
            path: PathBuf::from("images/a.png"),
            point: Point::new(26, 26),
        }
    );
    assert_eq!(agent.pointer().clicks.len(), 1);
    assert_eq!(agent.screen().captures, 1);
}

#[test]
fn paused_tick_does_no_work() {
    let scene = Scene::new(true);
    let state = RunState::new();
    state.toggle();
    let mut agent = agent(&scene, FakeScreen::showing(scene.screen.clone()), state);

    assert_eq!(agent.tick(), TickOutcome::Paused);
    assert_eq!(agent.screen().captures, 0);
    assert!(agent.pointer().clicks.is_empty());
    assert_eq!(agent.store().decode_count(), 0);
}

#[test]
fn pause_takes_effect_before_the_next_template() {
    let scene = Scene::new(false);
    let state = RunState::new();
    let screen = FakeScreen {
        pause_on_capture: Some(state.clone()),
        ..FakeScreen::showing(scene.screen.clone())
    };
    let mut agent = agent(&scene, screen, state);

    assert_eq!(agent.tick(), TickOutcome::Interrupted { checked: 1 });
    assert!(agent.pointer().clicks.is_empty());
    assert!(!agent.store().contains(Path::new("images/b.png")));
}

#[test]
fn unusable_templates_are_skipped_for_the_rest_of_the_run() {
    let scene = Scene::new(false);
    let decoder = scene.decoder(vec![
        (
            "images/a_broken.png",
            Err(TemplateLoadError::Corrupt {
                path: PathBuf::from("images/a_broken.png"),
                reason: "truncated".into(),
            }),
        ),
        ("images/a_empty.png", Ok(ColorImage::new(Vec::new(), 0, 0).unwrap())),
    ]);
    let mut agent = ControlLoop::new(
        FakeScreen::showing(noise(200, 120, 9)),
        FakePointer::default(),
        decoder,
        StaticTemplateSource::new([
            "images/a.png",
            "images/a_broken.png",
            "images/a_empty.png",
            "images/b.png",
        ]),
        RunState::new(),
    );

    assert!(matches!(agent.tick(), TickOutcome::NoMatch { .. }));
    assert!(agent.is_skipped(Path::new("images/a_broken.png")));
    assert!(agent.is_skipped(Path::new("images/a_empty.png")));
    assert!(!agent.is_skipped(Path::new("images/a.png")));
    let decodes = agent.store().decode_count();
    assert_eq!(decodes, 4);

    assert_eq!(agent.tick(), TickOutcome::NoMatch { checked: 2 });
    assert_eq!(agent.store().decode_count(), decodes);
}

#[test]
fn capture_failure_abandons_the_tick() {
    let scene = Scene::new(false);
    let mut agent = agent(&scene, FakeScreen::broken(), RunState::new());

    assert_eq!(agent.tick(), TickOutcome::CaptureFailed);
    assert_eq!(agent.screen().captures, 1);
    assert!(agent.pointer().clicks.is_empty());
    assert!(!agent.is_skipped(Path::new("images/a.png")));
}

#[test]
fn rejected_click_still_ends_the_tick() {
    let scene = Scene::new(true);
    let mut agent = ControlLoop::new(
        FakeScreen::showing(scene.screen.clone()),
        FakePointer {
            at: Point::new(7, 7),
            refuse_clicks: true,
            ..Default::default()
        },
        scene.decoder(Vec::new()),
        StaticTemplateSource::new(["images/a.png", "images/b.png"]),
        RunState::new(),
    );

    let outcome = agent.tick();
    assert_eq!(
        outcome,
        TickOutcome::ClickFailed {
            path: PathBuf::from("images/a.png"),
            point: Point::new(26, 26),
            error: ActuationError::Rejected {
                reason: "input blocked".into()
            },
        }
    );
    assert_eq!(agent.screen().captures, 1);
    assert_eq!(agent.pointer().at, Point::new(7, 7));
}

/// Runs `f` with a plain-text subscriber writing into `out`.
fn with_log_capture<R>(out: &SharedBuf, f: impl FnOnce() -> R) -> R {
    let writer = out.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

#[test]
fn listing_failure_ends_each_tick_and_warns_once() {
    let scene = Scene::new(false);
    let mut agent = ControlLoop::new(
        FakeScreen::showing(scene.screen.clone()),
        FakePointer::default(),
        scene.decoder(Vec::new()),
        FailingSource,
        RunState::new(),
    );

    let logs = SharedBuf::default();
    with_log_capture(&logs, || {
        for _ in 0..3 {
            assert_eq!(agent.tick(), TickOutcome::EnumerateFailed);
        }
    });
    assert_eq!(agent.screen().captures, 0);
    assert_eq!(logs.contents().matches("template listing failed").count(), 1);
}

#[test]
fn flat_template_is_skipped_with_a_warning() {
    let scene = Scene::new(false);
    let decoder = scene.decoder(vec![(
        "images/a_flat.png",
        Ok(ColorImage::filled(8, 8, [90, 120, 30])),
    )]);
    let mut agent = ControlLoop::new(
        FakeScreen::showing(scene.screen.clone()),
        FakePointer::default(),
        decoder,
        StaticTemplateSource::new(["images/a_flat.png", "images/b.png"]),
        RunState::new(),
    );

    let logs = SharedBuf::default();
    let outcome = with_log_capture(&logs, || agent.tick());
    assert_eq!(
        outcome,
        TickOutcome::Clicked {
            path: PathBuf::from("images/b.png"),
            point: Point::new(108, 58),
        }
    );
    assert!(agent.is_skipped(Path::new("images/a_flat.png")));
    let logs = logs.contents();
    assert!(logs.contains("skipping template"), "{logs}");
    assert!(logs.contains("flat template"), "{logs}");

    agent.tick();
    assert_eq!(agent.screen().captures, 3);
}

#[test]
fn writes_a_dot_per_checked_template() {
    let scene = Scene::new(false);
    let out = SharedBuf::default();
    let mut agent = agent(&scene, FakeScreen::showing(scene.screen.clone()), RunState::new())
        .with_liveness(Box::new(out.clone()));

    agent.tick();
    assert_eq!(out.contents(), ".\n");
    agent.tick();
    assert_eq!(out.contents(), ".\n.\n");
}

#[test]
fn no_match_leaves_line_open() {
    let scene = Scene::new(false);
    let out = SharedBuf::default();
    let mut agent = ControlLoop::new(
        FakeScreen::showing(noise(200, 120, 5)),
        FakePointer::default(),
        scene.decoder(Vec::new()),
        StaticTemplateSource::new(["images/a.png", "images/b.png"]),
        RunState::new(),
    )
    .with_liveness(Box::new(out.clone()));

    assert_eq!(agent.tick(), TickOutcome::NoMatch { checked: 2 });
    assert_eq!(out.contents(), "..");
}

#[test]
fn run_while_resumes_after_toggle() {
    let scene = Scene::new(false);
    let state = RunState::new();
    state.toggle();
    let mut agent = agent(&scene, FakeScreen::showing(scene.screen.clone()), state.clone());

    let mut paused_ticks = 0;
    let mut last = None;
    let ticks = agent.run_while(|outcome| {
        last = Some(outcome.clone());
        if *outcome == TickOutcome::Paused {
            paused_ticks += 1;
            if paused_ticks == 3 {
                state.toggle();
            }
            true
        } else {
            false
        }
    });

    assert_eq!(ticks, 4);
    assert!(matches!(last, Some(TickOutcome::Clicked { .. })));
    assert_eq!(agent.pointer().clicks, vec![Point::new(108, 58)]);
}
