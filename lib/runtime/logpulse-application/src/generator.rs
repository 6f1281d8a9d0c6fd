//! Synthetic log event generation.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use uuid::{Builder, Uuid};

use logpulse_domain::{EmitterConfig, LogLevel, LogRecord};

pub const SERVICE_CATALOG: [&str; 6] = [
    "auth-service",
    "payment-gateway",
    "user-api",
    "inventory-service",
    "notification-worker",
    "search-indexer",
];

const ENDPOINTS: [&str; 5] = [
    "/api/v1/login",
    "/api/v1/orders",
    "/api/v1/users",
    "/api/v1/cart",
    "/healthz",
];

/// Builds records and latency draws from an injected random source.
#[derive(Debug, Clone, PartialEq)]
pub struct LogGenerator {
    latency_min_ms: f64,
    latency_max_ms: f64,
}

impl LogGenerator {
    pub fn new(config: &EmitterConfig) -> Self {
        Self {
            latency_min_ms: config.latency_min_ms,
            latency_max_ms: config.latency_max_ms.max(config.latency_min_ms),
        }
    }

    pub fn record<R: Rng + ?Sized>(&self, rng: &mut R, timestamp: DateTime<Utc>) -> LogRecord {
        let id = random_id(rng);
        let level = pick_level(rng);
        let service = SERVICE_CATALOG.choose(rng).copied().unwrap_or("unknown");
        let message = message_for(level, rng);
        LogRecord::new(id, timestamp, level, service, message)
    }

    pub fn latency<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.latency_max_ms <= self.latency_min_ms {
            return self.latency_min_ms;
        }
        rng.gen_range(self.latency_min_ms..=self.latency_max_ms)
    }
}

impl Default for LogGenerator {
    fn default() -> Self {
        Self::new(&EmitterConfig::default())
    }
}

fn random_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

// Roughly the mix of a healthy production stream.
fn pick_level<R: Rng + ?Sized>(rng: &mut R) -> LogLevel {
    match rng.gen_range(0..100u8) {
        0..=54 => LogLevel::Info,
        55..=74 => LogLevel::Debug,
        75..=91 => LogLevel::Warn,
        _ => LogLevel::Error,
    }
}

fn message_for<R: Rng + ?Sized>(level: LogLevel, rng: &mut R) -> String {
    let endpoint = ENDPOINTS.choose(rng).copied().unwrap_or("/");
    match level {
        LogLevel::Info => match rng.gen_range(0..3u8) {
            0 => format!("GET {endpoint} completed with 200"),
            1 => format!("User {} signed in", rng.gen_range(1000..10000u32)),
            _ => format!("Processed batch of {} events", rng.gen_range(10..500u32)),
        },
        LogLevel::Debug => match rng.gen_range(0..2u8) {
            0 => format!("Cache lookup for {endpoint}: hit"),
            _ => format!("Connection pool size is {}", rng.gen_range(4..64u32)),
        },
        LogLevel::Warn => match rng.gen_range(0..3u8) {
            0 => format!("Slow response on {endpoint}"),
            1 => format!("Retrying upstream call (attempt {})", rng.gen_range(2..5u32)),
            _ => format!("Memory usage at {}%", rng.gen_range(75..95u32)),
        },
        LogLevel::Error => match rng.gen_range(0..3u8) {
            0 => format!("POST {endpoint} failed with 500"),
            1 => "Database connection timed out".to_string(),
            _ => format!("Payment declined: upstream code {}", rng.gen_range(400..600u32)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_same_seed_same_records() {
        let generator = LogGenerator::default();
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            assert_eq!(generator.record(&mut a, at), generator.record(&mut b, at));
            assert_eq!(generator.latency(&mut a), generator.latency(&mut b));
        }
    }

    #[test]
    fn test_records_use_catalog_and_unique_ids() {
        let generator = LogGenerator::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut ids = std::collections::HashSet::new();
        for _ in 0..200 {
            let record = generator.record(&mut rng, Utc::now());
            assert!(SERVICE_CATALOG.contains(&record.service.as_str()));
            assert!(!record.message.is_empty());
            assert!(ids.insert(record.id));
        }
    }

    #[test]
    fn test_latency_within_configured_range() {
        let generator = LogGenerator::default();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let latency = generator.latency(&mut rng);
            assert!((50.0..=500.0).contains(&latency), "latency {latency}");
        }
    }

    #[test]
    fn test_degenerate_latency_range() {
        let generator = LogGenerator::new(&EmitterConfig {
            latency_min_ms: 120.0,
            latency_max_ms: 120.0,
            ..EmitterConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generator.latency(&mut rng), 120.0);
    }
}
