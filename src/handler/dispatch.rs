//! Request dispatch module
//!
//! Entry point for HTTP request processing: SPA routing, static delivery
//! and access logging. Every method is routed the same way; HEAD only
//! drops the body.

use crate::config::AppState;
use crate::handler::static_files;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request data the static file layer needs, borrowed from the request
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub if_range: Option<&'a str>,
    pub range: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    fn from_request<B>(req: &'a Request<B>) -> Self {
        let headers = req.headers();
        Self {
            path: req.uri().path(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header_str(headers, "if-none-match"),
            if_modified_since: header_str(headers, "if-modified-since"),
            if_range: header_str(headers, "if-range"),
            range: header_str(headers, "range"),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type: request bodies are never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let (mut response, served) = serve_routed(&req, &state);

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert("Server", server);
    }

    if state.access_log() {
        let entry = access_entry(&req, &response, served, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route the path, then serve the chosen file with the route's headers
///
/// Returns the response and the tree key that was served.
fn serve_routed<B>(req: &Request<B>, state: &AppState) -> (Response<Full<Bytes>>, String) {
    let ctx = RequestContext::from_request(req);
    let route = state.router.route(ctx.path, state.assets.as_ref());
    let key = state.router.target_key(&route.decision);

    let mut response = static_files::serve_asset(&ctx, state.assets.as_ref(), key);
    if let Some(cache_control) = route.cache_control {
        response
            .headers_mut()
            .insert("Cache-Control", HeaderValue::from_static(cache_control));
    }

    (response, key.to_string())
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    served: String,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header_str(req.headers(), "referer").map(ToString::to_string);
    entry.user_agent = header_str(req.headers(), "user-agent").map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry.served = Some(served);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetFile, MemoryTree};
    use crate::cli::Cli;
    use crate::config::Config;
    use crate::http::cache::IMMUTABLE;
    use chrono::{TimeZone, Utc};
    use http_body_util::BodyExt;

    const INDEX: &str = "<!DOCTYPE html><html><body><div id=\"root\"></div></body></html>";
    const APP_JS: &str = "console.log('tempest');";

    fn test_state() -> Arc<AppState> {
        let mut tree = MemoryTree::new();
        tree.insert_file(
            "index.html",
            AssetFile {
                data: Bytes::from_static(INDEX.as_bytes()),
                content_type: "text/html; charset=utf-8",
                last_modified: Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()),
            },
        )
        .unwrap();
        tree.insert("assets/app.a1b2.js", APP_JS).unwrap();
        tree.insert("assets/fonts/inter.woff2", vec![1u8, 2, 3]).unwrap();
        tree.insert("robots.txt", "User-agent: *").unwrap();

        let cli = Cli {
            config: "/nonexistent/spa-server-test-config".to_string(),
            ..Cli::default()
        };
        let mut config = Config::load_from(&cli, None).unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::new(config, Arc::new(tree)))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn send(req: Request<()>) -> (Response<Full<Bytes>>, Bytes) {
        let response = handle_request(req, test_state(), peer()).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        (Response::from_parts(parts, Full::new(bytes.clone())), bytes)
    }

    async fn get(path: &str) -> (Response<Full<Bytes>>, Bytes) {
        send(Request::get(path).body(()).unwrap()).await
    }

    fn header<'a>(response: &'a Response<Full<Bytes>>, name: &str) -> Option<&'a str> {
        header_str(response.headers(), name)
    }

    #[tokio::test]
    async fn test_serves_hashed_asset_with_immutable_cache() {
        let (response, body) = get("/assets/app.a1b2.js").await;
        assert_eq!(response.status(), 200);
        assert_eq!(body, APP_JS.as_bytes());
        assert_eq!(header(&response, "content-type"), Some("text/javascript; charset=utf-8"));
        assert_eq!(header(&response, "cache-control"), Some(IMMUTABLE));
    }

    #[tokio::test]
    async fn test_client_route_falls_back_to_root_document() {
        let (response, body) = get("/dashboard/settings").await;
        assert_eq!(response.status(), 200);
        assert_eq!(body, INDEX.as_bytes());
        assert_eq!(header(&response, "content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(header(&response, "cache-control"), None);
        assert_eq!(header(&response, "location"), None);
    }

    #[tokio::test]
    async fn test_missing_asset_fallback_is_tagged_immutable() {
        let (response, body) = get("/assets/missing.js").await;
        assert_eq!(response.status(), 200);
        assert_eq!(body, INDEX.as_bytes());
        assert_eq!(header(&response, "cache-control"), Some(IMMUTABLE));
    }

    #[tokio::test]
    async fn test_root_and_directories_serve_root_document() {
        for path in ["/", "/assets", "/assets/", "/assets/fonts"] {
            let (response, body) = get(path).await;
            assert_eq!(response.status(), 200, "{path}");
            assert_eq!(body, INDEX.as_bytes(), "{path}");
        }
        let (root, _) = get("/").await;
        assert_eq!(header(&root, "cache-control"), None);
    }

    #[tokio::test]
    async fn test_non_asset_file_has_no_cache_control() {
        let (response, body) = get("/robots.txt").await;
        assert_eq!(response.status(), 200);
        assert_eq!(body, "User-agent: *".as_bytes());
        assert_eq!(header(&response, "content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(header(&response, "cache-control"), None);
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        for path in ["/assets/app.a1b2.js", "/some/route", "/assets/missing.js"] {
            let (first, first_body) = get(path).await;
            let (second, second_body) = get(path).await;
            assert_eq!(first.status(), second.status());
            assert_eq!(first.headers(), second.headers());
            assert_eq!(first_body, second_body);
        }
    }

    #[tokio::test]
    async fn test_head_has_headers_but_no_body() {
        let req = Request::head("/assets/app.a1b2.js").body(()).unwrap();
        let (response, body) = send(req).await;
        assert_eq!(response.status(), 200);
        assert!(body.is_empty());
        assert_eq!(
            header(&response, "content-length"),
            Some(APP_JS.len().to_string().as_str())
        );
        assert_eq!(header(&response, "cache-control"), Some(IMMUTABLE));
    }

    #[tokio::test]
    async fn test_etag_revalidation_keeps_route_headers() {
        let (first, _) = get("/assets/app.a1b2.js").await;
        let etag = header(&first, "etag").unwrap().to_string();

        let req = Request::get("/assets/app.a1b2.js")
            .header("If-None-Match", etag.as_str())
            .body(())
            .unwrap();
        let (response, body) = send(req).await;
        assert_eq!(response.status(), 304);
        assert!(body.is_empty());
        assert_eq!(header(&response, "etag"), Some(etag.as_str()));
        assert_eq!(header(&response, "cache-control"), Some(IMMUTABLE));
    }

    #[tokio::test]
    async fn test_if_modified_since() {
        let (first, _) = get("/").await;
        assert_eq!(header(&first, "last-modified"), Some("Sat, 01 Jun 2024 12:00:00 GMT"));

        let fresh = Request::get("/some/route")
            .header("If-Modified-Since", "Sat, 01 Jun 2024 12:00:00 GMT")
            .body(())
            .unwrap();
        assert_eq!(send(fresh).await.0.status(), 304);

        let stale = Request::get("/some/route")
            .header("If-Modified-Since", "Fri, 31 May 2024 12:00:00 GMT")
            .body(())
            .unwrap();
        assert_eq!(send(stale).await.0.status(), 200);

        // A non-matching If-None-Match overrides a fresh If-Modified-Since
        let both = Request::get("/")
            .header("If-None-Match", "\"stale\"")
            .header("If-Modified-Since", "Sat, 01 Jun 2024 12:00:00 GMT")
            .body(())
            .unwrap();
        assert_eq!(send(both).await.0.status(), 200);
    }

    #[tokio::test]
    async fn test_range_requests() {
        let req = Request::get("/assets/app.a1b2.js")
            .header("Range", "bytes=0-6")
            .body(())
            .unwrap();
        let (response, body) = send(req).await;
        assert_eq!(response.status(), 206);
        assert_eq!(body, &APP_JS.as_bytes()[..7]);
        assert_eq!(
            header(&response, "content-range"),
            Some(format!("bytes 0-6/{}", APP_JS.len()).as_str())
        );
        assert_eq!(header(&response, "cache-control"), Some(IMMUTABLE));

        let req = Request::get("/assets/app.a1b2.js")
            .header("Range", "bytes=9999-")
            .body(())
            .unwrap();
        assert_eq!(send(req).await.0.status(), 416);

        let req = Request::get("/assets/app.a1b2.js")
            .header("Range", "bytes=0-6")
            .header("If-Range", "\"outdated\"")
            .body(())
            .unwrap();
        let (response, body) = send(req).await;
        assert_eq!(response.status(), 200);
        assert_eq!(body, APP_JS.as_bytes());
    }

    #[tokio::test]
    async fn test_every_method_is_routed() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS, Method::PATCH] {
            let req = Request::builder()
                .method(method.clone())
                .uri("/assets/app.a1b2.js")
                .body(())
                .unwrap();
            let (response, body) = send(req).await;
            assert_eq!(response.status(), 200, "{method}");
            assert_eq!(body, APP_JS.as_bytes(), "{method}");
            assert_eq!(header(&response, "cache-control"), Some(IMMUTABLE), "{method}");
        }

        let req = Request::post("/settings/profile").body(()).unwrap();
        let (response, body) = send(req).await;
        assert_eq!(response.status(), 200);
        assert_eq!(body, INDEX.as_bytes());

        let req = Request::delete("/assets/missing.js").body(()).unwrap();
        let (response, body) = send(req).await;
        assert_eq!(response.status(), 200);
        assert_eq!(body, INDEX.as_bytes());
        assert_eq!(header(&response, "cache-control"), Some(IMMUTABLE));
    }

    #[tokio::test]
    async fn test_encoded_asset_prefix_is_tagged_immutable() {
        for path in ["/%61ssets/app.a1b2.js", "/assets%2Fapp.a1b2.js"] {
            let (response, body) = get(path).await;
            assert_eq!(response.status(), 200, "{path}");
            assert_eq!(body, APP_JS.as_bytes(), "{path}");
            assert_eq!(header(&response, "cache-control"), Some(IMMUTABLE), "{path}");
        }

        let (response, body) = get("/%61ssets/missing.js").await;
        assert_eq!(body, INDEX.as_bytes());
        assert_eq!(header(&response, "cache-control"), Some(IMMUTABLE));

        let req = Request::post("/%61ssets/app.a1b2.js").body(()).unwrap();
        let (response, _) = send(req).await;
        assert_eq!(header(&response, "cache-control"), Some(IMMUTABLE));
    }

    #[tokio::test]
    async fn test_server_header() {
        let (response, _) = get("/").await;
        assert_eq!(header(&response, "server"), Some("spa-server"));
    }

    #[test]
    fn test_access_entry_records_fallback() {
        let req = Request::get("/dashboard?tab=1")
            .header("User-Agent", "curl/8")
            .body(())
            .unwrap();
        let response = Response::builder()
            .status(200)
            .body(Full::new(Bytes::from_static(b"12345")))
            .unwrap();
        let entry = access_entry(&req, &response, "index.html".to_string(), peer(), Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/dashboard");
        assert_eq!(entry.query.as_deref(), Some("tab=1"));
        assert_eq!(entry.body_bytes, 5);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8"));
        assert_eq!(entry.served.as_deref(), Some("index.html"));
    }
}
