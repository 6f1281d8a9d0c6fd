//! Streaming ingestion and rolling-metrics aggregation engine.
//!
//! # Examples
//! ```rust,no_run
//! use logpulse_application::Dashboard;
//! use logpulse_domain::DashboardConfig;
//! use logpulse_ports::PortSet;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let dashboard = Dashboard::new(DashboardConfig::default(), PortSet::empty());
//! let id = dashboard.subscribe(|snapshot| println!("{} logs", snapshot.metrics.total_logs));
//! dashboard.start()?;
//! dashboard.request_analysis();
//! dashboard.stop().await;
//! dashboard.unsubscribe(id);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod analysis;
pub mod dashboard;
pub mod emitter;
pub mod engine;
pub mod generator;
pub mod health;
pub mod subscription;

pub use aggregator::MetricsAggregator;
pub use analysis::{AnalysisError, AnalysisRequestor, AnalysisSink, InFlight, PendingAnalysis};
pub use dashboard::{AnalysisTrigger, Dashboard};
pub use emitter::{Emitter, EmitterHandle};
pub use engine::Engine;
pub use generator::{LogGenerator, SERVICE_CATALOG};
pub use health::{HealthSimulator, HealthTransition};
pub use subscription::{SnapshotCallback, SubscriptionId, Subscribers};
