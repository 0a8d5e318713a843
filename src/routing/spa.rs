//! SPA fallback router

use crate::assets::{AssetEntry, AssetTree};
use crate::http::cache;
use percent_encoding::percent_decode_str;

/// Which logical resource a request resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Serve the file stored under this tree key
    ServeAsset(String),
    /// Serve the root document
    ServeRoot,
}

/// Router output for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub decision: RoutingDecision,
    /// `Cache-Control` to set on whatever response is produced
    pub cache_control: Option<&'static str>,
}

/// Stateless SPA router
///
/// Paths that resolve to a file in the tree are served as-is. Everything
/// else (unknown paths, directories, undecodable paths) gets the root
/// document with a 200, never a redirect.
///
/// Paths under the immutable prefix are tagged with a one-year immutable
/// `Cache-Control`. The tag is computed from the percent-decoded request
/// path before any fallback, so a missing `/assets/...` file answered with
/// the root document is tagged too. Clients and CDNs may rely on this, keep it.
#[derive(Debug, Clone)]
pub struct Router {
    root_document: String,
    immutable_prefix: String,
}

impl Router {
    pub fn new(root_document: impl Into<String>, immutable_prefix: impl Into<String>) -> Self {
        Self {
            root_document: root_document.into(),
            immutable_prefix: immutable_prefix.into(),
        }
    }

    pub fn route(&self, path: &str, tree: &dyn AssetTree) -> Route {
        // Undecodable paths keep their raw form; they can never name a file
        let decoded = percent_decode_str(path).decode_utf8();
        let path = decoded.as_deref().unwrap_or(path);

        let cache_control = path
            .starts_with(self.immutable_prefix.as_str())
            .then_some(cache::IMMUTABLE);

        let decision = if decoded.is_ok() {
            Self::decide(path, tree)
        } else {
            RoutingDecision::ServeRoot
        };

        Route {
            decision,
            cache_control,
        }
    }

    /// Tree key a decision resolves to
    pub fn target_key<'a>(&'a self, decision: &'a RoutingDecision) -> &'a str {
        match decision {
            RoutingDecision::ServeAsset(key) => key,
            RoutingDecision::ServeRoot => &self.root_document,
        }
    }

    /// Pick the file for an already decoded path
    fn decide(path: &str, tree: &dyn AssetTree) -> RoutingDecision {
        if path == "/" {
            return RoutingDecision::ServeRoot;
        }

        let key = path.strip_prefix('/').unwrap_or(path);
        match tree.lookup(key) {
            Some(AssetEntry::File(_)) => RoutingDecision::ServeAsset(key.to_string()),
            Some(AssetEntry::Directory) | None => RoutingDecision::ServeRoot,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new("index.html", "/assets/")
    }
}
