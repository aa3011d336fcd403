use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{TimestepError, TimestepResult};

/// Fixed-step limits for one scheduler.
///
/// `update_rate` is the simulation step in seconds, `update_limit` caps how
/// many steps may run inside one real frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimestepConfig {
    #[serde(default = "default_update_rate")]
    pub update_rate: f64,

    #[serde(default = "default_update_limit")]
    pub update_limit: u32,
}

fn default_update_rate() -> f64 {
    1.0 / 60.0
}
fn default_update_limit() -> u32 {
    10
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            update_rate: default_update_rate(),
            update_limit: default_update_limit(),
        }
    }
}

impl TimestepConfig {
    /// Validated constructor.
    pub fn new(update_rate: f64, update_limit: u32) -> TimestepResult<Self> {
        let cfg = Self {
            update_rate,
            update_limit,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build from a step frequency, e.g. `from_hz(60.0, 10)`.
    pub fn from_hz(hz: f64, update_limit: u32) -> TimestepResult<Self> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(TimestepError::invalid(
                "update_hz",
                format!("must be a finite value > 0, got {hz}"),
            ));
        }
        Self::new(1.0 / hz, update_limit)
    }

    pub fn validate(&self) -> TimestepResult<()> {
        if !self.update_rate.is_finite() || self.update_rate <= 0.0 {
            return Err(TimestepError::invalid(
                "update_rate",
                format!("must be a finite number of seconds > 0, got {}", self.update_rate),
            ));
        }
        if self.update_limit == 0 {
            return Err(TimestepError::invalid("update_limit", "must be > 0, got 0"));
        }
        Ok(())
    }

    #[inline]
    pub fn update_hz(&self) -> f64 {
        1.0 / self.update_rate
    }

    pub fn from_toml_str(s: &str) -> TimestepResult<Self> {
        let cfg: TimestepConfig =
            toml::from_str(s).map_err(|e| TimestepError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Missing file means defaults; anything unreadable or invalid is an error.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sixty_hz_with_ten_steps() {
        let cfg = TimestepConfig::default();
        assert!((cfg.update_rate - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(cfg.update_limit, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_and_non_finite_rates() {
        for rate in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = TimestepConfig::new(rate, 10).unwrap_err();
            assert!(err.is_invalid_configuration(), "rate {rate} accepted");
        }
    }

    #[test]
    fn rejects_zero_limit() {
        let err = TimestepConfig::new(1.0 / 60.0, 0).unwrap_err();
        assert!(matches!(
            err,
            TimestepError::InvalidConfiguration { field: "update_limit", .. }
        ));
    }

    #[test]
    fn from_hz_inverts_frequency() {
        let cfg = TimestepConfig::from_hz(120.0, 8).unwrap();
        assert!((cfg.update_rate - 1.0 / 120.0).abs() < 1e-12);
        assert!((cfg.update_hz() - 120.0).abs() < 1e-9);
        assert!(TimestepConfig::from_hz(0.0, 8).is_err());
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let cfg = TimestepConfig::from_toml_str("update_limit = 4").unwrap();
        assert_eq!(cfg.update_limit, 4);
        assert_eq!(cfg.update_rate, default_update_rate());
    }

    #[test]
    fn toml_values_are_validated() {
        let err = TimestepConfig::from_toml_str("update_rate = 0.0").unwrap_err();
        assert!(err.is_invalid_configuration());

        let err = TimestepConfig::from_toml_str("update_rate = \"fast\"").unwrap_err();
        assert!(matches!(err, TimestepError::Config(_)));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TimestepConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, TimestepConfig::default());
    }

    #[test]
    fn file_is_parsed_and_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("good.toml");
        fs::write(&good, "update_rate = 0.01\nupdate_limit = 3\n").unwrap();
        let cfg = TimestepConfig::load_or_default(&good).unwrap();
        assert_eq!(cfg, TimestepConfig::new(0.01, 3).unwrap());

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "update_limit = [").unwrap();
        match TimestepConfig::load_or_default(&bad) {
            Err(TimestepError::Config(msg)) => assert!(msg.contains("bad.toml")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
