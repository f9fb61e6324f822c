use thiserror::Error;

use crate::fetcher::FetchError;
use crate::llm_client::LlmError;

/// User-facing messages. Upstream detail never reaches the client.
pub const ANALYSIS_FAILED: &str = "Could not analyze profile data. Please try again later.";
pub const GITHUB_ANALYSIS_FAILED: &str = "Failed to analyze GitHub profile. The AI model could \
    not process the repository data. Please try again later.";
pub const MENTOR_FAILED: &str =
    "An error occurred while communicating with the AI mentor. Please try again later.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("fetch failure: {0}")]
    FetchFailure(#[from] FetchError),

    #[error("schema violation: {0}")]
    SchemaViolation(String),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        if e.is_upstream() {
            AnalysisError::UpstreamUnavailable(e.to_string())
        } else {
            AnalysisError::SchemaViolation(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_errors_split_into_upstream_and_schema() {
        let api = LlmError::Api {
            status: 503,
            message: "down".to_string(),
        };
        assert!(matches!(
            AnalysisError::from(api),
            AnalysisError::UpstreamUnavailable(_)
        ));
        assert!(matches!(
            AnalysisError::from(LlmError::EmptyContent),
            AnalysisError::SchemaViolation(_)
        ));
        assert!(matches!(
            AnalysisError::from(LlmError::ToolRoundsExceeded { rounds: 6 }),
            AnalysisError::SchemaViolation(_)
        ));
    }
}
