//! Port traits connecting the engine to external collaborators.

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;

use logpulse_domain::LogRecord;

/// External text summarization of recent log activity.
///
/// Implementations are opaque to the engine: they receive at most the
/// configured number of records, newest first, and either produce text or
/// fail. Failures are treated as "service unavailable" whatever their cause.
#[async_trait]
pub trait SummarizerPort: Send + Sync {
    async fn summarize(&self, records: &[LogRecord]) -> Result<String>;
}

#[derive(Clone)]
pub struct PortSet {
    pub summarizer: Arc<dyn SummarizerPort>,
}

impl PortSet {
    pub fn empty() -> Self {
        Self {
            summarizer: Arc::new(NullSummarizerPort),
        }
    }

    pub fn with_summarizer(summarizer: Arc<dyn SummarizerPort>) -> Self {
        Self { summarizer }
    }
}

impl Default for PortSet {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Clone, Copy, Default)]
struct NullSummarizerPort;

#[async_trait]
impl SummarizerPort for NullSummarizerPort {
    async fn summarize(&self, _records: &[LogRecord]) -> Result<String> {
        bail!("no summarizer configured")
    }
}
