//! Asset tree module
//!
//! Read-only view over the files an SPA build produced. A tree is populated
//! once at startup and then shared by every request without locking.
//! Two backends exist: the tree bundled into the binary, and an in-memory
//! tree that can be loaded from a directory on disk.

mod embedded;
mod memory;

pub use embedded::{Dist, EmbeddedTree};
pub use memory::MemoryTree;

use crate::error::AssetError;
use chrono::{DateTime, Utc};
use hyper::body::Bytes;

/// A single file held by an asset tree
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub data: Bytes,
    pub content_type: &'static str,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Result of a successful lookup
#[derive(Debug, Clone)]
pub enum AssetEntry {
    File(AssetFile),
    Directory,
}

/// Path-indexed, immutable collection of static files
///
/// Keys are relative paths without a leading slash (`assets/app.js`).
/// A lookup for a key that is not a valid tree path returns `None`.
pub trait AssetTree: Send + Sync {
    fn lookup(&self, key: &str) -> Option<AssetEntry>;
}

/// Check that `key` is a normalized relative path
///
/// Rejects empty keys and keys with empty, `.` or `..` segments, which also
/// rules out leading and trailing slashes.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.contains('\0')
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Every proper ancestor directory of `key`, outermost first
///
/// `a/b/c.js` yields `a` and `a/b`.
pub(crate) fn parent_directories(key: &str) -> impl Iterator<Item = &str> {
    key.match_indices('/').map(move |(i, _)| &key[..i])
}

/// Fail unless `root_document` resolves to a file in `tree`
pub fn ensure_root_document(tree: &dyn AssetTree, root_document: &str) -> Result<(), AssetError> {
    match tree.lookup(root_document) {
        Some(AssetEntry::File(_)) => Ok(()),
        _ => Err(AssetError::MissingRootDocument(root_document.to_string())),
    }
}
