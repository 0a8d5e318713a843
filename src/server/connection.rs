// Connection handling module
// Accepts TCP connections and serves each one on its own task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection unless the connection limit is reached
///
/// The counter is incremented before the limit check so two racing accepts
/// cannot both slip under the limit.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    active: &Arc<AtomicUsize>,
) {
    let prev_count = active.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            active.fetch_sub(1, Ordering::SeqCst);
            logger::log_connection_rejected(prev_count, max_conn);
            drop(stream);
            return;
        }
    }

    tracing::trace!("accepted connection from {peer_addr}");
    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(active));
}

/// Serve one connection on a spawned task
///
/// The connection lives at most `max(read_timeout, write_timeout)`
/// seconds (0 means no limit). The active counter is released when the
/// task ends, whatever the outcome. I/O errors only affect this connection.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    active: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let timeout_secs = performance.read_timeout.max(performance.write_timeout);
        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );

        if timeout_secs == 0 {
            if let Err(err) = conn.await {
                logger::log_connection_error(&err);
            }
        } else {
            match tokio::time::timeout(Duration::from_secs(timeout_secs), conn).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => logger::log_connection_error(&err),
                Err(_) => logger::log_connection_timeout(timeout_secs),
            }
        }

        active.fetch_sub(1, Ordering::SeqCst);
    });
}
