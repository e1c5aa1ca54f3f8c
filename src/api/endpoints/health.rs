//! `GET /api/healthz` — liveness plus model configuration status.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Whether an API key is configured; the service runs without one but
    /// comparisons will fail until it is set.
    pub openai: bool,
    pub model: String,
    pub timestamp: String,
}

pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        openai: ctx.config.openai_configured(),
        model: ctx.config.openai_model.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
