//! Listener module
//!
//! Builds the TCP listener through socket2 so socket options are set
//! before `bind`.

use crate::error::StartupError;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

const BACKLOG: i32 = 128;

/// Bind a listener on `addr`
///
/// `SO_REUSEADDR` lets a restarted process rebind while old connections
/// sit in `TIME_WAIT`. Must be called from inside a tokio runtime.
pub fn bind(addr: SocketAddr) -> Result<TcpListener, StartupError> {
    create_listener(addr).map_err(|source| StartupError::Bind { addr, source })
}

fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = bind("127.0.0.1:0".parse().unwrap()).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        let first = bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let taken = first.local_addr().unwrap();
        match bind(taken) {
            Err(StartupError::Bind { addr, .. }) => assert_eq!(addr, taken),
            other => panic!("Expected bind error, got {other:?}"),
        }
    }
}
