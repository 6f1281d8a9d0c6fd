use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LATENCY_WINDOW: usize = 30;
pub const COMPLETENESS_CEILING: f64 = 100.0;

/// Wall-clock label shown under a latency sample (local `HH:MM:SS`).
pub fn tick_label(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Latency observation tagged with the display time of its tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySample {
    pub label: String,
    pub latency_ms: f64,
}

impl LatencySample {
    pub fn new(label: impl Into<String>, latency_ms: f64) -> Self {
        Self {
            label: label.into(),
            latency_ms: latency_ms.max(0.0),
        }
    }
}

/// Rolling metrics as of one tick.
///
/// `latency_window` is ordered oldest to newest. `completeness` only ever
/// decays toward its floor and `total_logs` counts every tick ever applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub latency_window: Vec<LatencySample>,
    pub completeness: f64,
    pub total_logs: u64,
}

impl Metrics {
    pub fn starting_at(completeness: f64) -> Self {
        Self {
            latency_window: Vec::new(),
            completeness: completeness.min(COMPLETENESS_CEILING),
            total_logs: 0,
        }
    }

    pub fn latest_latency(&self) -> Option<f64> {
        self.latency_window.last().map(|sample| sample.latency_ms)
    }

    pub fn average_latency(&self) -> Option<f64> {
        if self.latency_window.is_empty() {
            return None;
        }
        let sum: f64 = self
            .latency_window
            .iter()
            .map(|sample| sample.latency_ms)
            .sum();
        Some(sum / self.latency_window.len() as f64)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::starting_at(COMPLETENESS_CEILING)
    }
}
