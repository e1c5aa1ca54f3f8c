//! Route table and middleware stack.
//!
//! Three routes under `/api/`: the comparison endpoint, the extraction
//! probe, and a health check. CORS is wide open — the service holds no
//! session state and the browser frontend is served from another origin.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Upload size ceiling across all multipart bodies (25 MB).
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/api/healthz", get(endpoints::health::check))
        .route("/api/compare", post(endpoints::compare::compare))
        .route("/api/test-pdf", post(endpoints::test_pdf::probe))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
