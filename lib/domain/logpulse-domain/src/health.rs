use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HealthStatus {
    #[default]
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Degraded => "Degraded",
            HealthStatus::Unhealthy => "Unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulated health of the dependent infrastructure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfraStatus {
    pub aws: HealthStatus,
    pub kubernetes: HealthStatus,
    pub sql_database: HealthStatus,
}

impl InfraStatus {
    /// All subjects healthy.
    pub fn healed() -> Self {
        Self::default()
    }

    pub fn all_healthy(&self) -> bool {
        *self == Self::healed()
    }

    pub fn subjects(&self) -> [(&'static str, HealthStatus); 3] {
        [
            ("AWS", self.aws),
            ("Kubernetes", self.kubernetes),
            ("SQL Database", self.sql_database),
        ]
    }
}
