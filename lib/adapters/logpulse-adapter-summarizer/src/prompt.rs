use anyhow::{Context, Result};
use serde::Serialize;

use logpulse_domain::LogRecord;

#[derive(Debug, Serialize)]
struct PromptRecord<'a> {
    timestamp: String,
    level: &'a str,
    service: &'a str,
    message: &'a str,
}

/// Serialize `records` (newest first) into the analysis prompt.
pub fn build_prompt(records: &[LogRecord]) -> Result<String> {
    let view: Vec<PromptRecord<'_>> = records
        .iter()
        .map(|record| PromptRecord {
            timestamp: record.timestamp.to_rfc3339(),
            level: record.level.as_str(),
            service: &record.service,
            message: &record.message,
        })
        .collect();
    let logs = serde_json::to_string_pretty(&view).context("failed to serialize log records")?;

    Ok(format!(
        "You are an expert Site Reliability Engineer reviewing live service logs.\n\
         Analyze the following {count} most recent log entries (newest first) and give a \
         concise summary.\n\
         1. Summarize overall system health.\n\
         2. Point out errors or warnings that need attention and the services involved.\n\
         3. Call out any patterns such as repeated failures or rising latency.\n\
         4. Suggest next steps for the on-call engineer.\n\n\
         Logs:\n{logs}\n",
        count = records.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use logpulse_domain::LogLevel;
    use uuid::Uuid;

    #[test]
    fn test_prompt_embeds_records_as_json() {
        let records = vec![LogRecord::new(
            Uuid::from_u128(1),
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            LogLevel::Error,
            "payment-gateway",
            "POST /api/v1/orders failed with 500",
        )];
        let prompt = build_prompt(&records).unwrap();
        assert!(prompt.contains("1 most recent log entries"));
        assert!(prompt.contains("\"level\": \"ERROR\""));
        assert!(prompt.contains("\"service\": \"payment-gateway\""));
        assert!(prompt.contains("2023-11-14T22:13:20+00:00"));
        assert!(!prompt.contains(&Uuid::from_u128(1).to_string()));
    }
}
