//! Listener lifecycle.

use crate::{ApiState, router};
use ritra_error::{ServerError, ServerErrorKind};
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

/// Binds `bind` and serves the front door until Ctrl-C.
///
/// # Errors
///
/// Returns `Bind` if the address cannot be bound and `Serve` if the server
/// loop fails.
#[instrument(skip(state))]
pub async fn serve(bind: &str, state: ApiState) -> Result<(), ServerError> {
    let listener = TcpListener::bind(bind).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind {
            addr: bind.to_string(),
            message: e.to_string(),
        })
    })?;
    let local = listener
        .local_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| bind.to_string());
    info!(addr = %local, run_mode = %state.run_mode(), "Front door listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;

    info!("Front door stopped");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` fires. A signal that cannot be installed never
/// resolves, so the server keeps running.
async fn wait_for_shutdown<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Cannot listen for shutdown signal, serving until killed");
            std::future::pending::<()>().await
        }
    }
}
