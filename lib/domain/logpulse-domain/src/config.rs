//! Dashboard configuration loaded from YAML.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields the reference tuning.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::logs::DEFAULT_LOG_CAPACITY;
use crate::metrics::{COMPLETENESS_CEILING, DEFAULT_LATENCY_WINDOW};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub emitter: EmitterConfig,
    pub buffer: BufferConfig,
    pub metrics: MetricsConfig,
    pub health: HealthConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub interval_ms: u64,
    pub latency_min_ms: f64,
    pub latency_max_ms: f64,
    /// Fixed seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
}

impl EmitterConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            latency_min_ms: 50.0,
            latency_max_ms: 500.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    pub log_capacity: usize,
    pub latency_window: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            latency_window: DEFAULT_LATENCY_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub completeness_start: f64,
    pub completeness_floor: f64,
    pub completeness_decay_max: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            completeness_start: COMPLETENESS_CEILING,
            completeness_floor: 98.0,
            completeness_decay_max: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub aws_degrade_probability: f64,
    pub kubernetes_failure_probability: f64,
    pub self_heal_probability: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            aws_degrade_probability: 0.01,
            kubernetes_failure_probability: 0.005,
            self_heal_probability: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub enabled: bool,
    pub max_records: usize,
    pub timeout_secs: u64,
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_records: 50,
            timeout_secs: 30,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid config at {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        // serde_yaml rejects an empty document, treat it as all defaults
        let config: Self = if raw.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(raw).context("failed to parse config yaml")?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let emitter = &self.emitter;
        if emitter.interval_ms == 0 {
            bail!("emitter.interval_ms must be positive");
        }
        if !(emitter.latency_min_ms >= 0.0 && emitter.latency_min_ms <= emitter.latency_max_ms) {
            bail!(
                "emitter latency range {}..{} is invalid",
                emitter.latency_min_ms,
                emitter.latency_max_ms
            );
        }

        if self.buffer.log_capacity == 0 || self.buffer.latency_window == 0 {
            bail!("buffer capacities must be positive");
        }

        let metrics = &self.metrics;
        if !(metrics.completeness_floor <= metrics.completeness_start
            && metrics.completeness_start <= COMPLETENESS_CEILING)
        {
            bail!(
                "completeness must satisfy floor ({}) <= start ({}) <= {}",
                metrics.completeness_floor,
                metrics.completeness_start,
                COMPLETENESS_CEILING
            );
        }
        if !(metrics.completeness_decay_max >= 0.0) {
            bail!("metrics.completeness_decay_max must be non-negative");
        }

        let health = &self.health;
        let probabilities = [
            ("aws_degrade_probability", health.aws_degrade_probability),
            (
                "kubernetes_failure_probability",
                health.kubernetes_failure_probability,
            ),
            ("self_heal_probability", health.self_heal_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                bail!("health.{name} must be within [0, 1], got {value}");
            }
        }
        let total: f64 = probabilities.iter().map(|(_, value)| value).sum();
        if total > 1.0 {
            bail!("health transition probabilities sum to {total}, must not exceed 1");
        }

        if self.analysis.max_records == 0 {
            bail!("analysis.max_records must be positive");
        }
        if self.analysis.timeout_secs == 0 {
            bail!("analysis.timeout_secs must be positive");
        }
        Ok(())
    }
}
