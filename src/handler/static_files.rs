//! Static file serving module
//!
//! Delivers one asset-tree entry: conditional requests, byte ranges and
//! HEAD. Which entry to deliver has already been decided by the router.

use crate::assets::{AssetEntry, AssetFile, AssetTree};
use crate::handler::dispatch::RequestContext;
use crate::http::{self, cache, range::RangeOutcome};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Serve the file stored under `key`
///
/// A miss here means the tree lost its root document, which startup
/// validation rules out; it is answered with 404 rather than a panic.
pub fn serve_asset(ctx: &RequestContext<'_>, tree: &dyn AssetTree, key: &str) -> Response<Full<Bytes>> {
    match tree.lookup(key) {
        Some(AssetEntry::File(file)) => build_static_file_response(&file, ctx),
        Some(AssetEntry::Directory) | None => {
            logger::log_warning(&format!("No file for '{key}' (requested {})", ctx.path));
            http::build_404_response()
        }
    }
}

/// Build a response for `file` honoring validators and `Range`
fn build_static_file_response(file: &AssetFile, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&file.data);

    // If-None-Match wins; If-Modified-Since only counts without it
    let not_modified = if ctx.if_none_match.is_some() {
        cache::check_etag_match(ctx.if_none_match, &etag)
    } else {
        cache::not_modified_since(ctx.if_modified_since, file.last_modified)
    };
    if not_modified {
        return http::build_304_response(file, &etag);
    }

    let range = if cache::if_range_allows(ctx.if_range, &etag, file.last_modified) {
        http::range::resolve(ctx.range, file.data.len())
    } else {
        RangeOutcome::Full
    };

    match range {
        RangeOutcome::Partial(range) => {
            http::build_partial_response(file, &etag, range, ctx.is_head)
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(file.data.len()),
        RangeOutcome::Full => http::build_asset_response(file, &etag, ctx.is_head),
    }
}
