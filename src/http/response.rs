//! HTTP response building module
//!
//! Builders for every status the server produces. None of them know about
//! routing; extra headers chosen by the router are applied by the caller.

use super::cache;
use super::range::ByteRange;
use crate::assets::AssetFile;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 200 response carrying a whole asset
pub fn build_asset_response(file: &AssetFile, etag: &str, is_head: bool) -> Response<Full<Bytes>> {
    let body = if is_head { Bytes::new() } else { file.data.clone() };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", file.content_type)
        .header("Content-Length", file.data.len())
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag);
    if let Some(modified) = file.last_modified {
        builder = builder.header("Last-Modified", cache::format_http_date(modified));
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 206 Partial Content response for one byte range of an asset
pub fn build_partial_response(
    file: &AssetFile,
    etag: &str,
    range: ByteRange,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        file.data.slice(range.start..=range.end)
    };

    let mut builder = Response::builder()
        .status(206)
        .header("Content-Type", file.content_type)
        .header("Content-Length", range.byte_count())
        .header("Content-Range", range.content_range(file.data.len()))
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag);
    if let Some(modified) = file.last_modified {
        builder = builder.header("Last-Modified", cache::format_http_date(modified));
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("206", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(file: &AssetFile, etag: &str) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(304).header("ETag", etag);
    if let Some(modified) = file.last_modified {
        builder = builder.header("Last-Modified", cache::format_http_date(modified));
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    text_response(404, "404 Not Found")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(total: usize) -> Response<Full<Bytes>> {
    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Range", format!("bytes */{total}"))
        .body(Full::new(Bytes::from_static(b"416 Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn text_response(status: u16, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(text.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::from_static(text.as_bytes())))
        })
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
