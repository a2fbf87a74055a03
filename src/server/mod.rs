mod attach;
mod router;
mod state;

pub use attach::{attach_caller, CallerDirectory};
pub use router::build_router;
pub use state::AppState;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::GatewayConfig;

pub async fn serve(config: GatewayConfig) -> Result<()> {
    let state = AppState::from_config(&config);
    let router = build_router(&state)?;

    let listener = TcpListener::bind(config.http.listen)
        .await
        .with_context(|| format!("failed to bind gateway on {}", config.http.listen))?;
    info!(
        listen = %config.http.listen,
        callers = state.callers.len(),
        tracing = state.tracer().is_some(),
        "Gateway listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited unexpectedly")?;

    if let Some(tracer) = state.tracer() {
        tracer.flush().await;
        info!(dropped = tracer.dropped(), "Trace dispatcher flushed");
    }
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            warn!(?err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
