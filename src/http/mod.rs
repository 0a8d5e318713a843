//! HTTP protocol layer module
//!
//! Content types, validators, range parsing and response builders. Nothing
//! here decides what to serve; that is the router's job.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

pub use response::{
    build_304_response, build_404_response, build_416_response, build_asset_response,
    build_partial_response,
};
