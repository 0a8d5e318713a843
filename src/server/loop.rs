// Server loop module
// Accepts connections until a shutdown signal arrives

use std::future::Future;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::wait_for_shutdown;
use crate::config::AppState;
use crate::logger;

/// Serve until SIGINT/SIGTERM
pub async fn run(listener: TcpListener, state: Arc<AppState>) {
    run_until(listener, state, wait_for_shutdown()).await;
}

/// Serve until `shutdown` resolves with a reason
///
/// Stops accepting new connections on shutdown. Connections already
/// accepted keep running on their own tasks.
pub async fn run_until<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = &'static str>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            reason = &mut shutdown => {
                logger::log_shutdown(reason);
                break;
            }
        }
    }
}
