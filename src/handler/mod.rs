//! Request handler module
//!
//! hyper service entry point: method policy, SPA routing, then static file
//! delivery with conditional and range support.

pub mod dispatch;
pub mod static_files;

pub use dispatch::handle_request;
