//! Simulated infrastructure health random walk.

use rand::Rng;

use logpulse_domain::{HealthConfig, HealthStatus, InfraStatus};

/// Which rule fired on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTransition {
    AwsDegraded,
    KubernetesFailed,
    SelfHealed,
    Unchanged,
}

/// Memoryless health simulator.
///
/// One uniform draw per tick is matched against cumulative bands in a fixed
/// order; the first band containing the draw wins.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthSimulator {
    aws_degrade: f64,
    kubernetes_failure: f64,
    self_heal: f64,
}

impl HealthSimulator {
    pub fn new(config: &HealthConfig) -> Self {
        Self {
            aws_degrade: config.aws_degrade_probability.clamp(0.0, 1.0),
            kubernetes_failure: config.kubernetes_failure_probability.clamp(0.0, 1.0),
            self_heal: config.self_heal_probability.clamp(0.0, 1.0),
        }
    }

    pub fn classify(&self, draw: f64) -> HealthTransition {
        let aws_band = self.aws_degrade;
        let kubernetes_band = aws_band + self.kubernetes_failure;
        let heal_band = kubernetes_band + self.self_heal;
        if draw < aws_band {
            HealthTransition::AwsDegraded
        } else if draw < kubernetes_band {
            HealthTransition::KubernetesFailed
        } else if draw < heal_band {
            HealthTransition::SelfHealed
        } else {
            HealthTransition::Unchanged
        }
    }

    /// Apply the rule selected by `draw` (uniform in `[0, 1)`).
    pub fn transition(&self, status: InfraStatus, draw: f64) -> (InfraStatus, HealthTransition) {
        let transition = self.classify(draw);
        let next = match transition {
            HealthTransition::AwsDegraded => InfraStatus {
                aws: HealthStatus::Degraded,
                ..status
            },
            HealthTransition::KubernetesFailed => InfraStatus {
                kubernetes: HealthStatus::Unhealthy,
                ..status
            },
            HealthTransition::SelfHealed => InfraStatus::healed(),
            HealthTransition::Unchanged => status,
        };
        (next, transition)
    }

    pub fn step<R: Rng + ?Sized>(
        &self,
        status: InfraStatus,
        rng: &mut R,
    ) -> (InfraStatus, HealthTransition) {
        self.transition(status, rng.r#gen::<f64>())
    }
}

impl Default for HealthSimulator {
    fn default() -> Self {
        Self::new(&HealthConfig::default())
    }
}
