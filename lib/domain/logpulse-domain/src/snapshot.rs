use crate::analysis::AnalysisState;
use crate::health::InfraStatus;
use crate::logs::LogBuffer;
use crate::metrics::Metrics;

/// Fully applied view of dashboard state at one point in tick order.
///
/// Published behind an `Arc` and never mutated afterwards. `sequence` counts
/// publications (ticks and analysis changes alike).
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub sequence: u64,
    pub logs: LogBuffer,
    pub metrics: Metrics,
    pub infra: InfraStatus,
    pub analysis: AnalysisState,
}

impl Snapshot {
    pub fn new(log_capacity: usize, completeness_start: f64) -> Self {
        Self {
            sequence: 0,
            logs: LogBuffer::new(log_capacity),
            metrics: Metrics::starting_at(completeness_start),
            infra: InfraStatus::healed(),
            analysis: AnalysisState::Idle,
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            sequence: 0,
            logs: LogBuffer::default(),
            metrics: Metrics::default(),
            infra: InfraStatus::healed(),
            analysis: AnalysisState::Idle,
        }
    }
}
