//! Analysis request lifecycle.

use serde::{Deserialize, Serialize};

/// Message reported when there is nothing to summarize.
pub const NO_LOGS_MESSAGE: &str = "No logs available to analyze yet.";

/// User-facing message for any summarizer failure. The cause goes to the
/// operator log, never here.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to get analysis from AI. Please check the logs for details.";

/// State of the most recent analysis request.
///
/// Transitions are driven only by request settlement:
/// `Idle -> Pending -> Succeeded | Failed`, and back to `Pending` on the next
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum AnalysisState {
    #[default]
    Idle,
    Pending,
    Succeeded(String),
    Failed(String),
}

impl AnalysisState {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, AnalysisState::Pending)
    }

    /// Summary text, empty unless the last request succeeded.
    pub fn result(&self) -> &str {
        match self {
            AnalysisState::Succeeded(text) => text,
            _ => "",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_per_state() {
        assert!(!AnalysisState::Idle.is_analyzing());
        assert!(AnalysisState::Pending.is_analyzing());
        assert_eq!(AnalysisState::Pending.result(), "");
        assert_eq!(AnalysisState::Pending.error(), None);

        let done = AnalysisState::Succeeded("X".into());
        assert!(!done.is_analyzing());
        assert_eq!(done.result(), "X");
        assert_eq!(done.error(), None);

        let failed = AnalysisState::Failed(ANALYSIS_FAILED_MESSAGE.into());
        assert!(!failed.is_analyzing());
        assert_eq!(failed.result(), "");
        assert_eq!(failed.error(), Some(ANALYSIS_FAILED_MESSAGE));
    }
}
