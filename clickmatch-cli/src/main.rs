use clap::Parser;
use clickmatch::io::FileDecoder;
use clickmatch::platform::{spawn_hotkey_listener, EnigoPointer, PrimaryScreen};
use clickmatch::{
    AgentConfig, ControlLoop, DirTemplateSource, Hotkey, MatchConfig, Matcher, RunState,
    ToggleSignal,
};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Clicks reference images when they appear on screen")]
struct Cli {
    /// Path to a JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Directory holding the template images.
    #[arg(long, value_name = "DIR")]
    images: Option<PathBuf>,
    /// Pause between scans in milliseconds.
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,
    /// Minimum match score in (0, 1].
    #[arg(long)]
    confidence: Option<f32>,
    /// Key that toggles running (F1-F12, Pause, ScrollLock, Escape).
    #[arg(long)]
    key: Option<Hotkey>,
    /// Scan rows in parallel.
    #[arg(long)]
    parallel: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ConfigJson {
    images_dir: PathBuf,
    extension: String,
    delay_ms: u64,
    confidence: f32,
    toggle_key: String,
    parallel: bool,
}

impl Default for ConfigJson {
    fn default() -> Self {
        let cfg = AgentConfig::default();
        Self {
            images_dir: cfg.images_dir,
            extension: cfg.extension,
            delay_ms: cfg.delay.as_millis() as u64,
            confidence: cfg.confidence,
            toggle_key: cfg.toggle_key.to_string(),
            parallel: cfg.parallel,
        }
    }
}

impl ConfigJson {
    fn into_agent_config(self) -> Result<AgentConfig, Box<dyn std::error::Error>> {
        Ok(AgentConfig {
            images_dir: self.images_dir,
            extension: self.extension,
            delay: Duration::from_millis(self.delay_ms),
            confidence: self.confidence,
            toggle_key: self.toggle_key.parse()?,
            parallel: self.parallel,
        })
    }
}

fn resolve_config(cli: &Cli) -> Result<AgentConfig, Box<dyn std::error::Error>> {
    let file = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|err| format!("reading {}: {err}", path.display()))?;
            serde_json::from_str::<ConfigJson>(&text)?
        }
        None => ConfigJson::default(),
    };

    let mut cfg = file.into_agent_config()?;
    if let Some(images) = &cli.images {
        cfg.images_dir = images.clone();
    }
    if let Some(ms) = cli.delay_ms {
        cfg.delay = Duration::from_millis(ms);
    }
    if let Some(confidence) = cli.confidence {
        cfg.confidence = confidence;
    }
    if let Some(key) = cli.key {
        cfg.toggle_key = key;
    }
    cfg.parallel |= cli.parallel;
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("clickmatch=info".parse()?))
        .with_target(false)
        .init();

    let cfg = resolve_config(&cli)?;
    let match_cfg: MatchConfig = cfg.match_config();
    tracing::debug!(?cfg, "configuration resolved");

    println!("ClickMatch agent");
    println!("\nPress {} to toggle running.\n", cfg.toggle_key);

    let state = RunState::new();
    spawn_hotkey_listener(cfg.toggle_key, ToggleSignal::new(state.clone()))?;

    let mut agent = ControlLoop::new(
        PrimaryScreen::new(),
        EnigoPointer::new()?,
        FileDecoder,
        DirTemplateSource::new(&cfg.images_dir, cfg.extension.as_str()),
        state,
    )
    .with_matcher(Matcher::new().with_config(match_cfg))
    .with_delay(cfg.delay)
    .with_liveness(Box::new(io::stdout()));

    agent.run()
}
