//! Preference server
//!
//! Serves the two endpoints the HTTP remote tier talks to, backed by any
//! [`RemotePreferences`] implementation. Useful as a development backend and
//! for end-to-end tests of [`HttpPreferences`](crate::storage::HttpPreferences).

pub mod handlers;
pub mod router;

pub use handlers::PreferenceState;
pub use router::preference_routes;

use crate::core::RemotePreferences;
use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Serve the preference endpoints with graceful shutdown
///
/// This will:
/// - Bind to the provided address
/// - Start serving requests
/// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
pub async fn serve(preferences: Arc<dyn RemotePreferences>, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(preferences, listener, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_on<F>(
    preferences: Arc<dyn RemotePreferences>,
    listener: TcpListener,
    shutdown: F,
) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = preference_routes(PreferenceState::new(preferences)).layer(TraceLayer::new_for_http());

    tracing::info!("Preference server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Preference server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
