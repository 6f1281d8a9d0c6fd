use rand::Rng;

use logpulse_domain::{BufferConfig, LatencySample, Metrics, MetricsConfig};

/// Sliding latency window plus the derived counters.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsAggregator {
    window: usize,
    completeness_floor: f64,
    decay_max: f64,
}

impl MetricsAggregator {
    pub fn new(metrics: &MetricsConfig, buffer: &BufferConfig) -> Self {
        Self {
            window: buffer.latency_window.max(1),
            completeness_floor: metrics.completeness_floor,
            decay_max: metrics.completeness_decay_max.max(0.0),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Fold one tick into `old`, drawing the completeness decay from `rng`.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        old: &Metrics,
        latency_ms: f64,
        label: String,
        rng: &mut R,
    ) -> Metrics {
        let decay = rng.r#gen::<f64>() * self.decay_max;
        self.apply_with_decay(old, LatencySample::new(label, latency_ms), decay)
    }

    /// Deterministic core of [`MetricsAggregator::apply`].
    ///
    /// `decay` is expected in `[0, decay_max)`; negative values are ignored so
    /// completeness can never rise.
    pub fn apply_with_decay(&self, old: &Metrics, sample: LatencySample, decay: f64) -> Metrics {
        let keep = (old.latency_window.len() + 1).saturating_sub(self.window);
        let mut latency_window = Vec::with_capacity(self.window);
        latency_window.extend(old.latency_window.iter().skip(keep).cloned());
        latency_window.push(sample);

        let completeness = (old.completeness - decay.max(0.0))
            .max(self.completeness_floor)
            .min(old.completeness);

        Metrics {
            latency_window,
            completeness,
            total_logs: old.total_logs.saturating_add(1),
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new(&MetricsConfig::default(), &BufferConfig::default())
    }
}
