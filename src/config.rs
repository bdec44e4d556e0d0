use std::path::PathBuf;

use crate::airing::AiringWindow;
use crate::error::ConfigError;
use crate::history::DEFAULT_CAPACITY;

pub(crate) const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/visitors/stream";
const MAX_CAPACITY: usize = 64;

/// Power flag of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Power {
    On,
    Off,
}

impl Power {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "on" | "true" | "1" => Some(Power::On),
            "off" | "false" | "0" => Some(Power::Off),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Power::On => Power::Off,
            Power::Off => Power::On,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Power::On => "on",
            Power::Off => "off",
        }
    }
}

/// Everything the host hands to the display once, at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub endpoint: String,
    pub capacity: usize,
    pub power: Power,
    /// Serialized initial snapshot, decoded later by the display.
    pub snapshot: Option<String>,
    pub program: AiringWindow,
    /// Output name the overlay surface is pinned to.
    pub screen: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            capacity: DEFAULT_CAPACITY,
            power: Power::On,
            snapshot: None,
            program: AiringWindow::default(),
            screen: None,
        }
    }
}

/// Return the path to the display config file.
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".config/retro-display/display.md")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Display,
    Program,
}

/// Parse the markdown config.
///
/// Format:
/// ```markdown
/// # display
/// - endpoint: http://127.0.0.1:8080/visitors/stream
/// - capacity: 8
/// - power: on
/// - snapshot: {"total": 3, "history": [0, 1, 3]}
///
/// # program
/// - title: Late Night Retro Cartoon Marathon
/// - url: https://example.invalid/marathon
/// - start: 22:00
/// - end: 23:30
/// ```
///
/// Unknown headings and keys are skipped. Capacity is clamped to 1..=64.
pub fn parse_config(content: &str) -> DisplayConfig {
    let mut config = DisplayConfig::default();
    let mut section = Section::None;

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(heading) = trimmed.strip_prefix("# ") {
            section = match heading.trim().to_lowercase().as_str() {
                "display" => Section::Display,
                "program" => Section::Program,
                other => {
                    tracing::debug!("config: skipping section {other:?}");
                    Section::None
                }
            };
            continue;
        }

        let Some((key, value)) = trimmed
            .strip_prefix("- ")
            .and_then(|rest| rest.split_once(':'))
        else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match (section, key) {
            (Section::Display, "endpoint") => config.endpoint = value.to_string(),
            (Section::Display, "capacity") => match value.parse::<usize>() {
                Ok(n) => config.capacity = n.clamp(1, MAX_CAPACITY),
                Err(_) => tracing::warn!("config: invalid capacity {value:?}, keeping default"),
            },
            (Section::Display, "power") => match Power::parse(value) {
                Some(p) => config.power = p,
                None => tracing::warn!("config: invalid power flag {value:?}"),
            },
            (Section::Display, "snapshot") => config.snapshot = Some(value.to_string()),
            (Section::Display, "screen") => config.screen = Some(value.to_string()),
            (Section::Program, "title") => config.program.title = value.to_string(),
            (Section::Program, "url") => config.program.url = Some(value.to_string()),
            (Section::Program, "start") => config.program.start_time = Some(value.to_string()),
            (Section::Program, "end") => config.program.end_time = Some(value.to_string()),
            _ => {}
        }
    }

    config
}

/// Apply `RETRO_DISPLAY_*` overrides from `lookup` (normally `std::env::var`).
pub fn apply_overrides(config: &mut DisplayConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(endpoint) = lookup("RETRO_DISPLAY_ENDPOINT").filter(|s| !s.is_empty()) {
        config.endpoint = endpoint;
    }
    if let Some(power) = lookup("RETRO_DISPLAY_POWER").and_then(|s| Power::parse(&s)) {
        config.power = power;
    }
    if let Some(screen) = lookup("RETRO_DISPLAY_SCREEN").filter(|s| !s.is_empty()) {
        config.screen = Some(screen);
    }
}

fn read_file() -> Result<Option<DisplayConfig>, ConfigError> {
    let path = config_file_path();
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(parse_config(&content)))
}

/// Load the config file (if any) and apply environment overrides.
pub fn load() -> DisplayConfig {
    let mut config = match read_file() {
        Ok(Some(config)) => {
            tracing::info!("config: loaded {}", config_file_path().display());
            config
        }
        Ok(None) => DisplayConfig::default(),
        Err(e) => {
            tracing::warn!("config: {e}, using defaults");
            DisplayConfig::default()
        }
    };
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    config
}
