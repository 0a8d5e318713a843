//! Asset tree bundled into the binary
//!
//! `dist/` is embedded at build time with `rust-embed`. In debug builds
//! rust-embed reads the folder from disk instead, which keeps the edit and
//! reload loop short during development.

use super::{parent_directories, AssetEntry, AssetFile, AssetTree};
use crate::http::mime;
use chrono::DateTime;
use hyper::body::Bytes;
use rust_embed::Embed;
use std::borrow::Cow;
use std::collections::HashSet;
use std::marker::PhantomData;

/// The SPA build output shipped with the server
#[derive(Embed)]
#[folder = "dist/"]
pub struct Dist;

/// Tree over any `rust-embed` folder
///
/// rust-embed only knows about files, so the directory set is derived from
/// the embedded paths once, on construction.
pub struct EmbeddedTree<E> {
    directories: HashSet<String>,
    _assets: PhantomData<fn() -> E>,
}

impl<E: Embed> EmbeddedTree<E> {
    pub fn new() -> Self {
        let mut directories = HashSet::new();
        for path in E::iter() {
            for dir in parent_directories(&path) {
                directories.insert(dir.to_string());
            }
        }
        Self {
            directories,
            _assets: PhantomData,
        }
    }

    pub fn file_count(&self) -> usize {
        E::iter().count()
    }
}

impl<E: Embed> Default for EmbeddedTree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Embed> AssetTree for EmbeddedTree<E> {
    fn lookup(&self, key: &str) -> Option<AssetEntry> {
        if !super::is_valid_key(key) {
            return None;
        }

        if let Some(file) = E::get(key) {
            let last_modified = file
                .metadata
                .last_modified()
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0));
            let data = match file.data {
                Cow::Borrowed(bytes) => Bytes::from_static(bytes),
                Cow::Owned(bytes) => Bytes::from(bytes),
            };
            let content_type = mime::content_type_for(key, &data);

            return Some(AssetEntry::File(AssetFile {
                data,
                content_type,
                last_modified,
            }));
        }

        self.directories
            .contains(key)
            .then_some(AssetEntry::Directory)
    }
}
