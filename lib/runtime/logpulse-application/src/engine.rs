use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, warn};

use logpulse_domain::{AnalysisState, DashboardConfig, LogRecord, Snapshot, tick_label};

use crate::aggregator::MetricsAggregator;
use crate::health::{HealthSimulator, HealthTransition};
use crate::subscription::{SubscriptionId, Subscribers};

// Keeps the engine's draws independent of an emitter seeded with the same value.
const ENGINE_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Tick reducer owning the current snapshot.
///
/// Every mutation builds a complete new [`Snapshot`], swaps it in, and then
/// notifies subscribers, so no reader ever observes a half-applied tick.
pub struct Engine {
    snapshot: Arc<Snapshot>,
    aggregator: MetricsAggregator,
    health: HealthSimulator,
    rng: Box<dyn RngCore + Send>,
    subscribers: Subscribers,
}

impl Engine {
    pub fn new(config: &DashboardConfig) -> Self {
        let rng: Box<dyn RngCore + Send> = match config.emitter.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed ^ ENGINE_SEED_SALT)),
            None => Box::new(StdRng::from_entropy()),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: &DashboardConfig, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            snapshot: Arc::new(Snapshot::new(
                config.buffer.log_capacity,
                config.metrics.completeness_start,
            )),
            aggregator: MetricsAggregator::new(&config.metrics, &config.buffer),
            health: HealthSimulator::new(&config.health),
            rng,
            subscribers: Subscribers::new(),
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Fold one event into the state and publish the result.
    pub fn apply_tick(&mut self, record: LogRecord, latency_ms: f64) -> Arc<Snapshot> {
        let current = &self.snapshot;
        let label = tick_label(&record.timestamp);
        let metrics = self
            .aggregator
            .apply(&current.metrics, latency_ms, label, &mut *self.rng);
        let (infra, transition) = self.health.step(current.infra, &mut *self.rng);

        match transition {
            HealthTransition::AwsDegraded => warn!("simulated AWS degradation"),
            HealthTransition::KubernetesFailed => warn!("simulated Kubernetes failure"),
            HealthTransition::SelfHealed if infra != current.infra => {
                info!("infrastructure self-healed")
            }
            _ => {}
        }
        debug!(
            total = metrics.total_logs,
            latency_ms,
            completeness = metrics.completeness,
            "tick applied"
        );

        let next = Snapshot {
            sequence: current.sequence + 1,
            logs: current.logs.push(record),
            metrics,
            infra,
            analysis: current.analysis.clone(),
        };
        self.publish(next)
    }

    /// Republish the current state with a new analysis state.
    pub fn set_analysis(&mut self, analysis: AnalysisState) -> Arc<Snapshot> {
        let next = Snapshot {
            sequence: self.snapshot.sequence + 1,
            analysis,
            ..Snapshot::clone(&self.snapshot)
        };
        self.publish(next)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Arc<Snapshot>) + Send + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, next: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(next);
        self.snapshot = Arc::clone(&snapshot);
        self.subscribers.publish(&snapshot);
        snapshot
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}
