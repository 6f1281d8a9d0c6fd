//! Summarizer backed by a Gemini-style `generateContent` endpoint.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use logpulse_domain::{AnalysisConfig, LogRecord};
use logpulse_ports::SummarizerPort;

use crate::prompt::build_prompt;

#[derive(Clone)]
pub struct GeminiSummarizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key_env: String,
    api_key: Option<String>,
}

const API_KEY_HEADER: &str = "x-goog-api-key";

impl fmt::Debug for GeminiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSummarizer")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key_env", &self.api_key_env)
            .finish_non_exhaustive()
    }
}

impl GeminiSummarizer {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        // The requestor enforces its own deadline; this one only bounds a stuck socket.
        let client = reqwest::Client::builder()
            .timeout(config.timeout() + Duration::from_secs(5))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            api_key: None,
        })
    }

    /// Use `key` instead of reading the configured environment variable.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    fn api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("{} is not set", self.api_key_env))
    }
}

#[async_trait]
impl SummarizerPort for GeminiSummarizer {
    async fn summarize(&self, records: &[LogRecord]) -> Result<String> {
        let key = self.api_key()?;
        let prompt = build_prompt(records)?;
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = self.endpoint_url();
        debug!(%url, records = records.len(), "calling summarizer");
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, key)
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("summarizer request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("summarizer returned {status}: {}", detail.trim());
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("summarizer response was not valid json")?;
        extract_text(payload)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

fn extract_text(payload: GenerateResponse) -> Result<String> {
    let text: String = payload
        .candidates
        .into_iter()
        .next()
        .map(|candidate| {
            candidate
                .content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        bail!("summarizer response contained no text");
    }
    Ok(text)
}
