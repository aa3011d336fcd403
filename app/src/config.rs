use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use timestep_core::{TelemetryConfig, TimestepConfig, TimestepError, TimestepResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,

    /// Stop after this many rendered frames; run until Ctrl+C when unset.
    #[serde(default)]
    pub max_frames: Option<u64>,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub timestep: TimestepConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Fixed steps the autopilot holds each arrow key.
    #[serde(default = "default_hold_ticks")]
    pub hold_ticks: u32,

    /// Artificial render cost. Raise it past `update_limit * update_rate` to
    /// watch the scheduler fall behind.
    #[serde(default)]
    pub render_cost_ms: u64,
}

fn default_title() -> String {
    "Time Step Demo".to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}
fn default_hold_ticks() -> u32 {
    60
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            hold_ticks: default_hold_ticks(),
            render_cost_ms: 0,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            max_frames: None,
            log_filter: default_log_filter(),
            timestep: TimestepConfig::default(),
            telemetry: TelemetryConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> TimestepResult<Self> {
        let cfg: AppConfig =
            toml::from_str(s).map_err(|e| TimestepError::Config(e.to_string()))?;
        cfg.timestep.validate()?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> TimestepResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s).map_err(|e| match e {
                TimestepError::Config(msg) => {
                    TimestepError::Config(format!("parse {}: {}", path.display(), msg))
                }
                other => other,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(TimestepError::Io {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }
}
