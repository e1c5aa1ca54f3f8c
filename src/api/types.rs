//! Shared state handed to every endpoint handler.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::pipeline::analysis::openai::{LlmJson, OpenAiClient};
use crate::pipeline::analysis::{AnalysisError, ComparePipeline};

/// Application context: configuration plus the comparison pipeline with its
/// injected model client. Cheap to clone; handlers share one pipeline (and
/// therefore one stage cache).
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<ComparePipeline>,
}

impl ApiContext {
    /// Build the context with a real OpenAI-compatible client.
    pub fn new(config: AppConfig) -> Result<Self, AnalysisError> {
        let client = Arc::new(OpenAiClient::new(&config)?);
        Ok(Self::with_llm(config, client))
    }

    /// Build the context around an arbitrary model client.
    pub fn with_llm(config: AppConfig, llm: Arc<dyn LlmJson>) -> Self {
        let pipeline = Arc::new(ComparePipeline::new(llm, config.stage_retries));
        Self {
            config: Arc::new(config),
            pipeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_builds_without_api_key() {
        // Startup must not require credentials; the key is checked per call.
        let ctx = ApiContext::new(AppConfig::default()).unwrap();
        assert!(!ctx.config.openai_configured());
    }
}
