//! The AI analysis chain: prompt templates, model client, strict response
//! parsing, invariant validation, stage caching, and the orchestrator that
//! sequences the eight stages into a comparison report.

pub mod cache;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod openai;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod types;
pub mod validate;

pub use orchestrator::{CompareInput, ComparePipeline};
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("OPENAI_API_KEY is not configured")]
    ApiKeyMissing,

    #[error("Cannot reach the model API at {0}")]
    Connection(String),

    #[error("Model API request timed out after {0}s")]
    Timeout(u64),

    #[error("Model API returned error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("Model did not return valid JSON: {0}")]
    JsonParsing(String),

    #[error("Model response failed schema validation: {0}")]
    SchemaValidation(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Transport-level failures where a fresh call may succeed.
    pub fn is_retryable_call(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout(_) | Self::HttpClient(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Malformed-output failures where a fresh completion may parse cleanly.
    pub fn is_retryable_parse(&self) -> bool {
        matches!(
            self,
            Self::EmptyResponse | Self::JsonParsing(_) | Self::SchemaValidation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable() {
        assert!(AnalysisError::Connection("http://x".into()).is_retryable_call());
        assert!(AnalysisError::Timeout(30).is_retryable_call());
        assert!(AnalysisError::Upstream { status: 503, body: String::new() }.is_retryable_call());
        assert!(AnalysisError::Upstream { status: 429, body: String::new() }.is_retryable_call());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!AnalysisError::ApiKeyMissing.is_retryable_call());
        assert!(!AnalysisError::Upstream { status: 401, body: String::new() }.is_retryable_call());
        assert!(!AnalysisError::JsonParsing("oops".into()).is_retryable_call());
    }

    #[test]
    fn parse_errors_are_retryable_as_parse() {
        assert!(AnalysisError::JsonParsing("oops".into()).is_retryable_parse());
        assert!(AnalysisError::SchemaValidation("missing field".into()).is_retryable_parse());
        assert!(AnalysisError::EmptyResponse.is_retryable_parse());
        assert!(!AnalysisError::ApiKeyMissing.is_retryable_parse());
    }
}
