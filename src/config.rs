//! Service configuration, read once at startup and injected into handlers.

use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "LegisDiff";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default chat model when `OPENAI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default API base when `OPENAI_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Low temperature biases the model toward deterministic structured output.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_STAGE_RETRIES: usize = 2;

/// Runtime configuration for the service.
///
/// Constructed from environment variables at process startup and passed
/// explicitly to the API context, so tests can build one directly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key for the model service. `None` means the compare pipeline
    /// cannot run; the server still starts and reports it via `/api/healthz`.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub bind_addr: SocketAddr,
    /// Per-request timeout for model calls, in seconds.
    pub llm_timeout_secs: u64,
    /// Additional attempts per pipeline stage after the first failure.
    pub stage_retries: usize,
    pub temperature: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8000))),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            stage_retries: DEFAULT_STAGE_RETRIES,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl AppConfig {
    /// Read configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let openai_model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| defaults.openai_model.clone());
        let openai_base_url = std::env::var("OPENAI_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| defaults.openai_base_url.clone());
        let bind_addr = std::env::var("LEGISDIFF_BIND_ADDR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.bind_addr);
        let llm_timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.llm_timeout_secs);
        let stage_retries = std::env::var("LLM_STAGE_RETRIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.stage_retries);

        Self {
            openai_api_key,
            openai_model,
            openai_base_url,
            bind_addr,
            llm_timeout_secs,
            stage_retries,
            temperature: defaults.temperature,
        }
    }

    /// Whether the model API is configured at all.
    pub fn openai_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }
}
