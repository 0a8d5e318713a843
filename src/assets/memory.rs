//! In-memory asset tree
//!
//! Holds every file in a map. Used when serving a build directory from disk
//! (the whole directory is read once at startup) and by tests.

use super::{is_valid_key, parent_directories, AssetEntry, AssetFile, AssetTree};
use crate::error::AssetError;
use crate::http::mime;
use chrono::{DateTime, Utc};
use hyper::body::Bytes;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct MemoryTree {
    files: HashMap<String, AssetFile>,
    directories: HashSet<String>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, inferring its content type from the key and content
    #[cfg(test)]
    pub fn insert(&mut self, key: &str, data: impl Into<Bytes>) -> Result<(), AssetError> {
        let data = data.into();
        let content_type = mime::content_type_for(key, &data);
        self.insert_file(
            key,
            AssetFile {
                data,
                content_type,
                last_modified: None,
            },
        )
    }

    pub fn insert_file(&mut self, key: &str, file: AssetFile) -> Result<(), AssetError> {
        if !is_valid_key(key) {
            return Err(AssetError::InvalidPath(PathBuf::from(key)));
        }
        for dir in parent_directories(key) {
            self.directories.insert(dir.to_string());
        }
        self.files.insert(key.to_string(), file);
        Ok(())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Read every regular file below `root` into memory
    ///
    /// Keys are the `/`-joined paths relative to `root`. File names that are
    /// not valid UTF-8 abort the load.
    pub fn load_dir(root: &Path) -> Result<Self, AssetError> {
        let mut tree = Self::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let entries = fs::read_dir(&dir).map_err(|source| AssetError::Io {
                path: dir.clone(),
                source,
            })?;

            for entry in entries {
                let entry = entry.map_err(|source| AssetError::Io {
                    path: dir.clone(),
                    source,
                })?;
                let path = entry.path();
                let metadata = fs::metadata(&path).map_err(|source| AssetError::Io {
                    path: path.clone(),
                    source,
                })?;

                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                if !metadata.is_file() {
                    continue;
                }

                let key = relative_key(root, &path)?;
                let data = fs::read(&path).map_err(|source| AssetError::Io {
                    path: path.clone(),
                    source,
                })?;
                let content_type = mime::content_type_for(&key, &data);
                let last_modified = metadata.modified().ok().map(DateTime::<Utc>::from);

                tree.insert_file(
                    &key,
                    AssetFile {
                        data: Bytes::from(data),
                        content_type,
                        last_modified,
                    },
                )?;
            }
        }

        Ok(tree)
    }
}

impl AssetTree for MemoryTree {
    fn lookup(&self, key: &str) -> Option<AssetEntry> {
        if let Some(file) = self.files.get(key) {
            return Some(AssetEntry::File(file.clone()));
        }
        self.directories
            .contains(key)
            .then_some(AssetEntry::Directory)
    }
}

/// Convert a path below `root` into a tree key
fn relative_key(root: &Path, path: &Path) -> Result<String, AssetError> {
    let invalid = || AssetError::InvalidPath(path.to_path_buf());
    let relative = path.strip_prefix(root).map_err(|_| invalid())?;

    let segments = relative
        .components()
        .map(|c| c.as_os_str().to_str().ok_or_else(invalid))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(segments.join("/"))
}
