//! Usage: TCP bind and serve with graceful shutdown.

use crate::shared::error::AppResult;
use axum::Router;
use tokio::net::TcpListener;

pub(crate) async fn serve(router: Router, listen_addr: &str) -> AppResult<()> {
    let listener = TcpListener::bind(listen_addr)
        .await
        .map_err(|e| format!("SYSTEM_ERROR: failed to bind {listen_addr}: {e}"))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("SYSTEM_ERROR: listener local_addr failed: {e}"))?;
    tracing::info!(listen_addr = %local_addr, "github oauth connector listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("SYSTEM_ERROR: server error: {e}"))?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
