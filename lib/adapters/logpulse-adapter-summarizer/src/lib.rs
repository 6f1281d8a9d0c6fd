//! Summarizer adapter implementations.

pub mod gemini;
pub mod prompt;

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use tracing::info;

use logpulse_domain::{AnalysisConfig, LogRecord};
use logpulse_ports::SummarizerPort;

pub use gemini::GeminiSummarizer;
pub use prompt::build_prompt;

/// Summarizer used when analysis is switched off in config.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSummarizer;

#[async_trait]
impl SummarizerPort for DisabledSummarizer {
    async fn summarize(&self, _records: &[LogRecord]) -> Result<String> {
        bail!("log analysis is disabled; set analysis.enabled in config")
    }
}

pub fn summarizer_from_config(config: &AnalysisConfig) -> Result<Arc<dyn SummarizerPort>> {
    if !config.enabled {
        info!("log analysis disabled");
        return Ok(Arc::new(DisabledSummarizer));
    }
    info!(model = %config.model, "log analysis via {}", config.endpoint);
    Ok(Arc::new(GeminiSummarizer::new(config)?))
}
