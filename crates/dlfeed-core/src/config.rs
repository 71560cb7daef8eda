use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::backoff::BackoffPolicy;

/// Reconnect backoff parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Delay before the first reconnect attempt, in seconds.
    pub initial_delay_secs: f64,
    /// Upper bound on the reconnect delay, in seconds.
    pub max_delay_secs: f64,
    /// Growth factor applied after every failed attempt.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: 1.0,
            max_delay_secs: 64.0,
            multiplier: 2.0,
        }
    }
}

impl BackoffConfig {
    pub fn to_policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(
            secs(self.initial_delay_secs),
            secs(self.max_delay_secs),
            self.multiplier,
        )
    }
}

/// Playback position persistence (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Records older than this many days are evicted.
    pub retention_days: u64,
    /// Interval between position saves while a track plays, in seconds.
    pub save_interval_secs: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            retention_days: 7,
            save_interval_secs: 2.0,
        }
    }
}

impl PlaybackConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_days.saturating_mul(86_400))
    }

    pub fn save_interval(&self) -> Duration {
        secs(self.save_interval_secs)
    }
}

/// Live channel flavour: server-sent events or WebSocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Sse,
    Websocket,
}

/// Global configuration loaded from `~/.config/dlfeed/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlfeedConfig {
    /// Base URL of the download service, e.g. `http://127.0.0.1:8080`.
    pub server_url: String,
    /// Which live channel to open.
    #[serde(default)]
    pub transport: TransportKind,
    /// Optional backoff policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub backoff: Option<BackoffConfig>,
    /// Optional playback persistence settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub playback: Option<PlaybackConfig>,
}

impl Default for DlfeedConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".to_string(),
            transport: TransportKind::Sse,
            backoff: None,
            playback: None,
        }
    }
}

impl DlfeedConfig {
    pub fn backoff_policy(&self) -> BackoffPolicy {
        self.backoff.clone().unwrap_or_default().to_policy()
    }

    pub fn playback(&self) -> PlaybackConfig {
        self.playback.clone().unwrap_or_default()
    }
}

/// Negative or non-finite seconds collapse to zero instead of panicking.
fn secs(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dlfeed")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// `$XDG_STATE_HOME/dlfeed/<file>`. The prefixed state home already ends in
/// `dlfeed`, so the file goes straight into it.
pub fn state_path(file: &str) -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dlfeed")?;
    Ok(xdg_dirs.get_state_home().join(file))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DlfeedConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DlfeedConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DlfeedConfig = toml::from_str(&data)?;
    Ok(cfg)
}
