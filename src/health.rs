//! Liveness listener
//!
//! Hosting platforms that idle out quiet services probe an HTTP port to
//! decide whether the process is alive. The watch loop has no web surface,
//! so this listener answers every probe with 404 while keeping the port
//! open. A 404 still proves liveness; there is nothing to serve.

use crate::error::{Result, SlotwatchError};
use axum::http::StatusCode;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Build the listener's router
///
/// Every path falls through to a 404 response.
pub fn router() -> Router {
    Router::new().fallback(not_found)
}

/// Bind the liveness port and serve until cancelled
///
/// # Arguments
///
/// * `port` - TCP port to listen on, bound on all interfaces
/// * `cancel` - Token that shuts the listener down
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails
pub async fn serve(port: u16, cancel: CancellationToken) -> Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(SlotwatchError::Io)?;

    info!(addr = %addr, "Liveness listener bound");
    serve_on(listener, cancel).await
}

/// Serve the liveness responder on an already-bound listener
pub async fn serve_on(listener: TcpListener, cancel: CancellationToken) -> Result<()> {
    axum::serve(listener, router())
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(SlotwatchError::Io)?;

    info!("Liveness listener stopped");
    Ok(())
}
