//! HTTP server lifecycle.
//!
//! `start_on` binds, mounts the router, and spawns the server in a
//! background task, returning a handle with a shutdown channel. `run` is
//! the binary's entry point: it serves on the configured address until
//! Ctrl-C.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::api::types::ApiContext;
use crate::config::AppConfig;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Safe to call twice.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Bind to `addr` (port 0 picks an ephemeral port) and spawn the server in
/// a background task.
pub async fn start_on(ctx: ApiContext, addr: SocketAddr) -> Result<ApiServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!(%addr, "API server binding");

    let app = api_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Serve on the configured address until Ctrl-C.
pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.bind_addr;
    if !config.openai_configured() {
        tracing::warn!("OPENAI_API_KEY is not set; comparisons will fail until it is configured");
    }

    let ctx = ApiContext::new(config)?;
    let mut server = start_on(ctx, addr).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received, shutting down");
    server.shutdown();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::pipeline::analysis::fixtures;

    fn test_ctx() -> ApiContext {
        ApiContext::with_llm(AppConfig::default(), Arc::new(fixtures::scripted_mock()))
    }

    fn localhost_ephemeral() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_on(test_ctx(), localhost_ephemeral())
            .await
            .expect("server should start");
        assert!(server.addr.port() > 0);

        let url = format!("http://{}/api/healthz", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["ok"], true);

        server.shutdown();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn unknown_route_returns_404_over_http() {
        let mut server = start_on(test_ctx(), localhost_ephemeral())
            .await
            .expect("server should start");

        let url = format!("http://{}/nonexistent", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_on(test_ctx(), localhost_ephemeral())
            .await
            .expect("server should start");
        server.shutdown();
        server.shutdown();
    }
}
