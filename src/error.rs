//! Error types
//!
//! Everything here is a startup failure. Per-request problems never surface
//! as errors: lookup misses fall back to the root document and connection
//! failures are logged by the transport.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to build an asset tree
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("root document '{0}' is missing from the asset tree")]
    MissingRootDocument(String),

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not a valid asset path", .0.display())]
    InvalidPath(PathBuf),
}

/// Failure that aborts process startup before any connection is accepted
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to load assets: {0}")]
    Assets(#[from] AssetError),

    #[error("failed to initialize logging: {0}")]
    Logger(String),

    #[error("failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
