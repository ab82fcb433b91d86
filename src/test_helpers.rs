//! Shared test utilities for the portfolio-carousel test suite.
//!
//! Provides an in-memory [`MemoryStore`] that can delay, break, or fail
//! individual paths (to reproduce out-of-order and partial loads), plus small
//! builders for categories, buttons and images.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let store = MemoryStore::new()
//!     .with_category("bolos", "Bolos", 0, &["01.jpg", "02.png"])
//!     .with_delay("portfolio/bolos/index.json", Duration::from_millis(30));
//! ```

use crate::catalog::{Category, TriggerButton};
use crate::gallery::LazyGallery;
use crate::storage::{ObjectStore, StorageError, StorageRef};
use crate::types::Image;
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::time::Duration;

// =========================================================================
// In-memory object store
// =========================================================================

/// Object store backed by a map of full paths to bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
    delays: HashMap<String, Duration>,
    broken_urls: HashSet<String>,
    failing_lists: HashSet<String>,
    list_calls: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, path: &str, bytes: &[u8]) -> Self {
        self.objects.insert(path.to_string(), bytes.to_vec());
        self
    }

    /// Add `portfolio/<key>/` with metadata, a `capa.webp` cover, and images.
    pub fn with_category(self, key: &str, title: &str, order: i64, images: &[&str]) -> Self {
        let meta = format!(r#"{{"title": "{title}", "order": {order}, "cover": "capa"}}"#);
        let mut store = self
            .with_object(&format!("portfolio/{key}/index.json"), meta.as_bytes())
            .with_object(&format!("portfolio/{key}/capa.webp"), b"cover");
        for image in images {
            store = store.with_object(&format!("portfolio/{key}/{image}"), b"image");
        }
        store
    }

    /// Delay every operation addressed at `path` (object or folder).
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// Make `download_url` fail for `path`.
    pub fn with_broken_url(mut self, path: &str) -> Self {
        self.broken_urls.insert(path.to_string());
        self
    }

    /// Make listing `path` fail.
    pub fn with_failing_listing(mut self, path: &str) -> Self {
        self.failing_lists.insert(path.to_string());
        self
    }

    /// Number of `list_objects` calls so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    async fn pause_for(&self, path: &str) {
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
    }

    fn check_listing(&self, path: &str) -> Result<(), StorageError> {
        if self.failing_lists.contains(path) {
            return Err(StorageError::Unavailable(format!("listing {path}")));
        }
        Ok(())
    }

    /// Entries directly below `folder`: (is_folder, name).
    fn children(&self, folder: &StorageRef) -> BTreeSet<(bool, String)> {
        let prefix = if folder.is_root() {
            String::new()
        } else {
            format!("{}/", folder.full_path())
        };
        self.objects
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .map(|rest| match rest.split_once('/') {
                Some((dir, _)) => (true, dir.to_string()),
                None => (false, rest.to_string()),
            })
            .collect()
    }
}

impl ObjectStore for MemoryStore {
    async fn list_folders(&self, prefix: &StorageRef) -> Result<Vec<StorageRef>, StorageError> {
        self.pause_for(prefix.full_path()).await;
        self.check_listing(prefix.full_path())?;
        Ok(self
            .children(prefix)
            .into_iter()
            .filter(|(is_folder, _)| *is_folder)
            .map(|(_, name)| prefix.child(&name))
            .collect())
    }

    async fn list_objects(&self, folder: &StorageRef) -> Result<Vec<StorageRef>, StorageError> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.pause_for(folder.full_path()).await;
        self.check_listing(folder.full_path())?;
        Ok(self
            .children(folder)
            .into_iter()
            .filter(|(is_folder, _)| !*is_folder)
            .map(|(_, name)| folder.child(&name))
            .collect())
    }

    async fn download_url(&self, object: &StorageRef) -> Result<String, StorageError> {
        let path = object.full_path();
        self.pause_for(path).await;
        if self.broken_urls.contains(path) {
            return Err(StorageError::Unavailable(format!("url for {path}")));
        }
        if !self.objects.contains_key(path) {
            return Err(StorageError::NotFound(path.to_string()));
        }
        Ok(format!("https://cdn.test/{path}"))
    }

    async fn get_content(&self, object: &StorageRef) -> Result<Vec<u8>, StorageError> {
        let path = object.full_path();
        self.pause_for(path).await;
        self.objects
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }
}

// =========================================================================
// Builders
// =========================================================================

pub fn default_extensions() -> Vec<String> {
    vec![".webp".to_string(), ".png".to_string(), ".jpg".to_string()]
}

pub fn button(key: &str, order: i64) -> TriggerButton {
    TriggerButton {
        key: key.to_string(),
        title: key.to_uppercase(),
        order,
        cover_url: None,
    }
}

/// `count` images named `01.webp`, `02.webp`, …
pub fn images(count: usize) -> Vec<Image> {
    (1..=count)
        .map(|n| Image {
            src: format!("https://cdn.test/img/{n:02}.webp"),
            alt: format!("{n:02}.webp"),
        })
        .collect()
}

/// A category whose gallery is already resolved to `count` images.
pub fn category(key: &str, count: usize) -> Category {
    Category {
        key: key.to_string(),
        title: key.to_uppercase(),
        order: 0,
        cover: "capa".to_string(),
        images: LazyGallery::resolved(StorageRef::new(&format!("portfolio/{key}")), images(count)),
    }
}

/// A category that lists lazily from `portfolio/<key>` in a store.
pub fn lazy_category(key: &str) -> Category {
    Category {
        key: key.to_string(),
        title: key.to_uppercase(),
        order: 0,
        cover: "capa".to_string(),
        images: LazyGallery::new(
            StorageRef::new(&format!("portfolio/{key}")),
            default_extensions(),
        ),
    }
}

/// All orderings of `items` (Heap's algorithm).
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.clone());
            return;
        }
        heap(k - 1, items, out);
        for i in 0..k - 1 {
            if k % 2 == 0 {
                items.swap(i, k - 1);
            } else {
                items.swap(0, k - 1);
            }
            heap(k - 1, items, out);
        }
    }

    let mut items = items.to_vec();
    let mut out = Vec::new();
    let k = items.len();
    heap(k, &mut items, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutations_cover_all_orderings() {
        let perms = permutations(&[1, 2, 3, 4]);
        assert_eq!(perms.len(), 24);
        let unique: BTreeSet<Vec<i32>> = perms.into_iter().collect();
        assert_eq!(unique.len(), 24);
    }
}
