//! On-demand log summarization with at most one request in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info};

use logpulse_domain::{
    ANALYSIS_FAILED_MESSAGE, AnalysisConfig, AnalysisState, LogRecord, NO_LOGS_MESSAGE,
};
use logpulse_ports::SummarizerPort;

/// Receives every analysis state change.
pub type AnalysisSink = Arc<dyn Fn(AnalysisState) + Send + Sync>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("an analysis request is already in flight")]
    Busy,
    #[error("summarizer unavailable: {0:#}")]
    Service(anyhow::Error),
    #[error("summarizer did not respond within {0:?}")]
    TimedOut(Duration),
}

/// Exclusive right to run one analysis. Releases the slot on drop.
#[derive(Debug)]
pub struct InFlight {
    slot: Arc<AtomicBool>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.slot.store(false, Ordering::Release);
    }
}

pub struct AnalysisRequestor {
    summarizer: Arc<dyn SummarizerPort>,
    sink: AnalysisSink,
    slot: Arc<AtomicBool>,
    max_records: usize,
    timeout: Duration,
}

impl AnalysisRequestor {
    pub fn new(
        summarizer: Arc<dyn SummarizerPort>,
        config: &AnalysisConfig,
        sink: AnalysisSink,
    ) -> Self {
        Self {
            summarizer,
            sink,
            slot: Arc::new(AtomicBool::new(false)),
            max_records: config.max_records.max(1),
            timeout: config.timeout(),
        }
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    pub fn is_in_flight(&self) -> bool {
        self.slot.load(Ordering::Acquire)
    }

    /// Claim the single analysis slot, or `None` if it is taken.
    pub fn try_begin(&self) -> Option<InFlight> {
        self.slot
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight {
                slot: Arc::clone(&self.slot),
            })
    }

    /// Summarize `recent` (newest first), keeping at most `max_records`.
    pub async fn analyze(&self, recent: &[LogRecord]) -> Result<String, AnalysisError> {
        let pending = self.begin(recent)?;
        self.finish(pending).await
    }

    /// Claim the slot and publish the opening state before returning.
    ///
    /// A non-empty batch publishes `Pending`. An empty one settles at once
    /// with the no-logs message and releases the slot.
    pub fn begin(&self, recent: &[LogRecord]) -> Result<PendingAnalysis, AnalysisError> {
        let permit = self.try_begin().ok_or(AnalysisError::Busy)?;

        if recent.is_empty() {
            debug!("analysis requested with an empty log buffer");
            (self.sink)(AnalysisState::Succeeded(NO_LOGS_MESSAGE.to_string()));
            return Ok(PendingAnalysis {
                batch: Vec::new(),
                _permit: None,
            });
        }

        let batch = recent[..recent.len().min(self.max_records)].to_vec();
        (self.sink)(AnalysisState::Pending);
        Ok(PendingAnalysis {
            batch,
            _permit: Some(permit),
        })
    }

    /// Call the summarizer for a request opened by [`AnalysisRequestor::begin`].
    pub async fn finish(&self, pending: PendingAnalysis) -> Result<String, AnalysisError> {
        if pending.batch.is_empty() {
            return Ok(NO_LOGS_MESSAGE.to_string());
        }

        let batch = pending.batch.as_slice();
        info!(records = batch.len(), "requesting log analysis");
        let call = self.summarizer.summarize(batch);
        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(err)) => Err(AnalysisError::Service(err)),
            Err(_) => Err(AnalysisError::TimedOut(self.timeout)),
        };

        match &outcome {
            Ok(text) => {
                info!(chars = text.len(), "log analysis completed");
                (self.sink)(AnalysisState::Succeeded(text.clone()));
            }
            Err(err) => {
                error!(error = %err, "log analysis failed");
                (self.sink)(AnalysisState::Failed(ANALYSIS_FAILED_MESSAGE.to_string()));
            }
        }
        outcome
    }
}

/// A request that has published its opening state and holds the slot until
/// it settles.
#[derive(Debug)]
pub struct PendingAnalysis {
    batch: Vec<LogRecord>,
    _permit: Option<InFlight>,
}

impl PendingAnalysis {
    pub fn batch(&self) -> &[LogRecord] {
        &self.batch
    }
}
