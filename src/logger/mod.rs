//! Logger module
//!
//! Two channels:
//! - diagnostics (lifecycle, warnings, errors) go through `tracing`
//! - access logs go through [`writer`], to stdout or an append-only file,
//!   formatted by [`AccessLogEntry`]

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use crate::error::StartupError;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

static TRACING_READY: AtomicBool = AtomicBool::new(false);

/// Initialize the logger with configuration
///
/// Should be called once at application startup. `RUST_LOG` takes
/// precedence over `logging.level`.
pub fn init(config: &Config) -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .map_err(|e| StartupError::Logger(format!("invalid log level: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| StartupError::Logger(e.to_string()))?;
    TRACING_READY.store(true, Ordering::Relaxed);

    writer::init(config.logging.access_log_file.as_deref())
        .map_err(|e| StartupError::Logger(format!("cannot open access log: {e}")))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, asset_source: &str) {
    tracing::info!("listening on http://{addr}");
    tracing::info!("serving {asset_source}");
    tracing::debug!(
        root_document = %config.assets.root_document,
        immutable_prefix = %config.assets.immutable_prefix,
        workers = ?config.server.workers,
        max_connections = ?config.performance.max_connections,
        access_log = config.logging.access_log,
        "configuration loaded"
    );
    if let Some(ref path) = config.logging.access_log_file {
        tracing::info!("access log: {path}");
    }
}

pub fn log_shutdown(signal: &str) {
    tracing::info!("{signal} received, no longer accepting connections");
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::debug!("failed to serve connection: {err}");
}

pub fn log_connection_timeout(secs: u64) {
    tracing::warn!("connection closed after {secs}s timeout");
}

pub fn log_connection_rejected(active: usize, max: u64) {
    tracing::warn!("max connections reached: {active}/{max}, connection rejected");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Report a startup failure, whether or not `init` got far enough
pub fn log_fatal(err: &StartupError) {
    if TRACING_READY.load(Ordering::Relaxed) {
        tracing::error!("{err}");
    } else {
        eprintln!("[FATAL] {err}");
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    writer::write_access(&entry.format(format));
}
