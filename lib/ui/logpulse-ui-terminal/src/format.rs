//! Line formatting for snapshots printed to stdout.

use anyhow::{Context, Result};
use serde::Serialize;

use logpulse_domain::{AnalysisState, HealthStatus, InfraStatus, LogRecord, Snapshot};

pub fn snapshot_line(snapshot: &Snapshot) -> String {
    let metrics = &snapshot.metrics;
    let latest = snapshot
        .logs
        .newest()
        .map(record_line)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "#{:<6} logs={:<6} latency={} avg={} completeness={:.3}% infra[{}] | {}",
        snapshot.sequence,
        metrics.total_logs,
        format_latency(metrics.latest_latency()),
        format_latency(metrics.average_latency()),
        metrics.completeness,
        infra_summary(&snapshot.infra),
        latest
    )
}

pub fn record_line(record: &LogRecord) -> String {
    format!(
        "{} {:<5} [{}] {}",
        record.timestamp.format("%H:%M:%S"),
        record.level,
        record.service,
        record.message
    )
}

pub fn infra_summary(infra: &InfraStatus) -> String {
    infra
        .subjects()
        .iter()
        .map(|(name, status)| format!("{name}:{}", status_icon(*status)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn status_icon(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "ok",
        HealthStatus::Degraded => "degraded",
        HealthStatus::Unhealthy => "DOWN",
    }
}

fn format_latency(value: Option<f64>) -> String {
    value
        .map(|ms| format!("{ms:.0}ms"))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Human-readable analysis block, or `None` when there is nothing to show.
pub fn analysis_block(state: &AnalysisState) -> Option<String> {
    match state {
        AnalysisState::Idle => None,
        AnalysisState::Pending => Some("analysis: running...".to_string()),
        AnalysisState::Succeeded(text) => Some(format!("analysis:\n{}", text.trim_end())),
        AnalysisState::Failed(message) => Some(format!("analysis error: {message}")),
    }
}

#[derive(Debug, Serialize)]
struct SnapshotView<'a> {
    sequence: u64,
    total_logs: u64,
    completeness: f64,
    latest_latency_ms: Option<f64>,
    average_latency_ms: Option<f64>,
    buffered_logs: usize,
    infra: &'a InfraStatus,
    analysis: &'a AnalysisState,
    newest: Option<&'a LogRecord>,
}

pub fn snapshot_json(snapshot: &Snapshot) -> Result<String> {
    let view = SnapshotView {
        sequence: snapshot.sequence,
        total_logs: snapshot.metrics.total_logs,
        completeness: snapshot.metrics.completeness,
        latest_latency_ms: snapshot.metrics.latest_latency(),
        average_latency_ms: snapshot.metrics.average_latency(),
        buffered_logs: snapshot.logs.len(),
        infra: &snapshot.infra,
        analysis: &snapshot.analysis,
        newest: snapshot.logs.newest(),
    };
    serde_json::to_string(&view).context("failed to serialize snapshot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use logpulse_domain::{LatencySample, LogLevel};
    use uuid::Uuid;

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.sequence = 3;
        snapshot.logs = snapshot.logs.push(LogRecord::new(
            Uuid::from_u128(9),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 15).unwrap(),
            LogLevel::Warn,
            "user-api",
            "Slow response on /api/v1/users",
        ));
        snapshot.metrics.total_logs = 3;
        snapshot.metrics.completeness = 99.9876;
        snapshot.metrics.latency_window = vec![
            LatencySample::new("12:30:14", 100.0),
            LatencySample::new("12:30:15", 200.0),
        ];
        snapshot.infra.kubernetes = HealthStatus::Unhealthy;
        snapshot
    }

    #[test]
    fn test_snapshot_line() {
        let line = snapshot_line(&snapshot());
        assert!(line.starts_with("#3 "));
        assert!(line.contains("logs=3 "));
        assert!(line.contains("latency=200ms avg=150ms"));
        assert!(line.contains("completeness=99.988%"));
        assert!(line.contains("AWS:ok Kubernetes:DOWN SQL Database:ok"));
        assert!(line.ends_with("12:30:15 WARN  [user-api] Slow response on /api/v1/users"));
    }

    #[test]
    fn test_empty_snapshot_line() {
        let line = snapshot_line(&Snapshot::default());
        assert!(line.contains("latency=n/a"));
        assert!(line.ends_with("| -"));
    }

    #[test]
    fn test_analysis_block() {
        assert_eq!(analysis_block(&AnalysisState::Idle), None);
        assert_eq!(
            analysis_block(&AnalysisState::Succeeded("fine\n".into())).as_deref(),
            Some("analysis:\nfine")
        );
        assert!(
            analysis_block(&AnalysisState::Failed("boom".into()))
                .unwrap()
                .contains("boom")
        );
    }

    #[test]
    fn test_snapshot_json() {
        let json = snapshot_json(&snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_logs"], 3);
        assert_eq!(value["infra"]["kubernetes"], "Unhealthy");
        assert_eq!(value["infra"]["sqlDatabase"], "Healthy");
        assert_eq!(value["analysis"]["state"], "idle");
        assert_eq!(value["newest"]["level"], "WARN");
    }
}
