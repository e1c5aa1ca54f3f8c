//! Chat-completions client for OpenAI-compatible APIs.
//!
//! Every pipeline stage goes through [`LlmJson::complete_json`]: one system
//! message, one user prompt, low temperature, JSON response format. The
//! trait keeps the orchestrator testable with mock clients.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::AnalysisError;
use crate::config::AppConfig;

/// One JSON-mode completion request against the model API.
#[async_trait]
pub trait LlmJson: Send + Sync {
    async fn complete_json(&self, system: &str, prompt: &str) -> Result<String, AnalysisError>;
}

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: &AppConfig) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.llm_timeout_secs))
            .build()
            .map_err(|e| AnalysisError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            temperature: config.temperature,
            timeout_secs: config.llm_timeout_secs,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LlmJson for OpenAiClient {
    async fn complete_json(&self, system: &str, prompt: &str) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::ApiKeyMissing)?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            response_format: ResponseFormat { kind: "json_object" },
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AnalysisError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    AnalysisError::Timeout(self.timeout_secs)
                } else {
                    AnalysisError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::JsonParsing(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        Ok(content)
    }
}

/// Mock client for testing — answers by matching prompt substrings, so one
/// mock can script a full pipeline run (each stage's template carries a
/// distinctive phrase).
pub struct MockLlmClient {
    default_response: String,
    stage_responses: Vec<(String, String)>,
}

impl MockLlmClient {
    pub fn new(default_response: &str) -> Self {
        Self {
            default_response: default_response.to_string(),
            stage_responses: Vec::new(),
        }
    }

    /// Respond with `response` to any prompt containing `marker`.
    /// Markers are checked in insertion order before the default applies.
    pub fn with_response(mut self, marker: &str, response: &str) -> Self {
        self.stage_responses.push((marker.to_string(), response.to_string()));
        self
    }
}

#[async_trait]
impl LlmJson for MockLlmClient {
    async fn complete_json(&self, _system: &str, prompt: &str) -> Result<String, AnalysisError> {
        for (marker, response) in &self.stage_responses {
            if prompt.contains(marker.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok(self.default_response.clone())
    }
}
