//! Object storage access.
//!
//! The catalog only ever needs four read operations from the bucket that
//! hosts the portfolio: list the sub-folders of a prefix, list the objects
//! directly inside a folder, resolve an object's public download URL, and
//! read an object's bytes. [`ObjectStore`] captures exactly that, so the
//! loader does not care which backend provides it.
//!
//! ## Paths
//!
//! Objects are addressed by slash-separated paths relative to the bucket
//! root (`portfolio/bolos/index.json`). [`StorageRef`] normalizes them
//! (no leading/trailing slashes, no empty segments) and exposes the last
//! segment as the object's name, the same way hosted storage SDKs do.
//!
//! ## Backends
//!
//! [`FsStore`] mirrors a bucket on the local filesystem: a directory tree
//! whose layout matches the bucket, plus a public base URL under which the
//! same tree is served. It is what the CLI uses and what the integration
//! tests run against.

use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A normalized reference to a folder or object in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageRef {
    full_path: String,
}

impl StorageRef {
    pub fn new(path: &str) -> Self {
        let full_path = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        Self { full_path }
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Last path segment (`"index.json"` for `portfolio/bolos/index.json`).
    pub fn name(&self) -> &str {
        self.full_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.full_path)
    }

    pub fn child(&self, name: &str) -> Self {
        if self.full_path.is_empty() {
            Self::new(name)
        } else {
            Self::new(&format!("{}/{}", self.full_path, name))
        }
    }

    pub fn is_root(&self) -> bool {
        self.full_path.is_empty()
    }
}

impl std::fmt::Display for StorageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_path)
    }
}

/// Read-only capability set the catalog needs from a storage backend.
///
/// Futures are awaited on the caller's task and never spawned, so no `Send`
/// bound is required of implementations.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Folders directly under `prefix`, sorted by name.
    async fn list_folders(&self, prefix: &StorageRef) -> Result<Vec<StorageRef>, StorageError>;

    /// Objects (not folders) directly inside `folder`, sorted by name.
    async fn list_objects(&self, folder: &StorageRef) -> Result<Vec<StorageRef>, StorageError>;

    /// Public URL an `<img>` can load the object from.
    async fn download_url(&self, object: &StorageRef) -> Result<String, StorageError>;

    /// Raw object bytes.
    async fn get_content(&self, object: &StorageRef) -> Result<Vec<u8>, StorageError>;
}

/// Local directory standing in for a hosted bucket.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Map a storage reference onto the filesystem, refusing anything that
    /// could escape the root.
    fn local_path(&self, reference: &StorageRef) -> Result<PathBuf, StorageError> {
        let relative = Path::new(reference.full_path());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(StorageError::InvalidPath(reference.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn list_children(
        &self,
        folder: &StorageRef,
        want_dirs: bool,
    ) -> Result<Vec<StorageRef>, StorageError> {
        let dir = self.local_path(folder)?;
        if !dir.is_dir() {
            return Err(StorageError::NotFound(folder.to_string()));
        }

        let mut children = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') {
                continue;
            }
            let is_dir = entry.file_type().is_dir();
            if is_dir == want_dirs {
                children.push(folder.child(&name));
            }
        }
        children.sort();
        Ok(children)
    }
}

impl ObjectStore for FsStore {
    async fn list_folders(&self, prefix: &StorageRef) -> Result<Vec<StorageRef>, StorageError> {
        self.list_children(prefix, true)
    }

    async fn list_objects(&self, folder: &StorageRef) -> Result<Vec<StorageRef>, StorageError> {
        self.list_children(folder, false)
    }

    async fn download_url(&self, object: &StorageRef) -> Result<String, StorageError> {
        let path = self.local_path(object)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(object.to_string()));
        }
        let encoded = object
            .full_path()
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Ok(format!("{}/{}", self.public_base_url, encoded))
    }

    async fn get_content(&self, object: &StorageRef) -> Result<Vec<u8>, StorageError> {
        let path = self.local_path(object)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(object.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
