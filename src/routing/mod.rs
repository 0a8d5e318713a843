//! Routing module
//!
//! Decides, per request path, which logical file to serve and which extra
//! headers to attach. Requests that do not name a real file fall back to the
//! root document so the client-side router can take over.

mod spa;

pub use spa::Router;
