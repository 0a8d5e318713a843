// Shutdown signal handling
//
// - SIGINT (Ctrl+C): stop accepting connections
// - SIGTERM: stop accepting connections (unix only)

use crate::logger;

/// Resolve when the process is asked to stop; returns the signal name
#[cfg(unix)]
pub async fn wait_for_shutdown() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                logger::log_warning(&format!("Cannot listen for SIGTERM: {e}"));
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = interrupt() => "SIGINT",
        () = terminate => "SIGTERM",
    }
}

/// Resolve when the process is asked to stop; returns the signal name
#[cfg(not(unix))]
pub async fn wait_for_shutdown() -> &'static str {
    interrupt().await;
    "Ctrl+C"
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_warning(&format!("Cannot listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
