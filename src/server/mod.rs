//! Server module
//!
//! TCP listener setup, the accept loop, per-connection HTTP/1 tasks and
//! signal-driven shutdown.

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module gets a different name
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::bind;
pub use server_loop::run;
