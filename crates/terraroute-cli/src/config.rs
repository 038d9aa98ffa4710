//! Runtime configuration from environment and optional JSON file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use terraroute_core::PlannerConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of `<CODE>.geojson` border files.
    pub borders_dir: PathBuf,
    /// Great-circle sub-segment length used by crossing tests.
    pub sample_step_km: f64,
    /// Per-route computation timeout.
    pub timeout_ms: u64,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            borders_dir: PathBuf::from("./data/borders"),
            sample_step_km: PlannerConfig::default().sample_step_km,
            timeout_ms: 10_000,
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Read a JSON config file, then apply environment overrides.
    /// Fields missing from the file keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config.with_overrides(|key| env::var(key).ok()))
    }

    /// Apply `TERRAROUTE_*` values from `lookup`. Unparseable values are ignored.
    pub fn with_overrides<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            borders_dir: lookup("TERRAROUTE_BORDERS_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.borders_dir),
            sample_step_km: lookup("TERRAROUTE_SAMPLE_STEP_KM")
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|step| step.is_finite() && *step > 0.0)
                .unwrap_or(self.sample_step_km),
            timeout_ms: lookup("TERRAROUTE_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(self.timeout_ms),
            log_json: lookup("TERRAROUTE_LOG_JSON")
                .and_then(|s| parse_bool(&s))
                .unwrap_or(self.log_json),
        }
    }

    pub fn planner(&self) -> PlannerConfig {
        PlannerConfig {
            sample_step_km: self.sample_step_km,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
