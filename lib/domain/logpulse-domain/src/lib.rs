//! Domain models and invariants.

pub mod analysis;
pub mod config;
pub mod health;
pub mod logs;
pub mod metrics;
pub mod snapshot;

pub use analysis::{ANALYSIS_FAILED_MESSAGE, AnalysisState, NO_LOGS_MESSAGE};
pub use config::{
    AnalysisConfig, BufferConfig, DashboardConfig, EmitterConfig, HealthConfig, MetricsConfig,
};
pub use health::{HealthStatus, InfraStatus};
pub use logs::{DEFAULT_LOG_CAPACITY, LogBuffer, LogLevel, LogRecord};
pub use metrics::{
    COMPLETENESS_CEILING, DEFAULT_LATENCY_WINDOW, LatencySample, Metrics, tick_label,
};
pub use snapshot::Snapshot;
