use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr};
use tokio_util::sync::CancellationToken;

use crate::{Res, api, management::LastReport};

pub fn router(report: LastReport) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/status", get(api::status).layer(Extension(report)))
}

/// Serves the status endpoints on `addr` until `shutdown` fires.
pub async fn start_status_server(
    addr: &str,
    report: LastReport,
    shutdown: CancellationToken,
) -> Res<()> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("Failed to parse server address {}: {}", addr, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("status server listening on {}", addr);

    axum::serve(listener, router(report))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}
