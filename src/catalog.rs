//! Portfolio catalog loading.
//!
//! On start-up the loader lists every category folder under the configured
//! root prefix and fetches each folder's metadata document. Fetches run
//! concurrently and finish in whatever order the store answers, so each
//! category's trigger button is placed into the [`ButtonRow`] by its
//! `order` as soon as it arrives; the row is sorted at every point in time,
//! not just at the end.
//!
//! ## Bucket Layout
//!
//! ```text
//! portfolio/                   # storage.root_prefix
//! ├── bolos/                   # category key = folder name
//! │   ├── index.json           # {"title": "Bolos", "order": 0, "cover": "capa"}
//! │   ├── capa.webp            # cover (stem from metadata + cover_extension)
//! │   ├── 01-chocolate.jpg     # gallery images (allow-listed extensions)
//! │   └── 02-morango.png
//! └── doces/
//!     └── ...
//! ```
//!
//! ## Failure Handling
//!
//! A category whose metadata is missing or malformed is dropped and logged;
//! the rest of the page is unaffected. Galleries are not touched here at all;
//! see [`crate::gallery`].

use crate::config::StorageConfig;
use crate::gallery::LazyGallery;
use crate::metadata::{MetadataError, fetch_metadata};
use crate::storage::{ObjectStore, StorageError, StorageRef};
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cannot list categories under {0}: {1}")]
    Listing(String, StorageError),
    #[error("Category {0}: {1}")]
    Metadata(String, MetadataError),
}

/// A portfolio category. Immutable once built.
#[derive(Debug, Clone)]
pub struct Category {
    /// Folder name; unique within the catalog.
    pub key: String,
    pub title: String,
    pub order: i64,
    /// Cover image filename stem.
    pub cover: String,
    pub images: LazyGallery,
}

/// The clickable card that opens a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerButton {
    pub key: String,
    pub title: String,
    pub order: i64,
    /// Resolved cover URL; `None` when the cover could not be resolved.
    pub cover_url: Option<String>,
}

/// Trigger buttons in display order.
#[derive(Debug, Clone, Default)]
pub struct ButtonRow {
    buttons: Vec<TriggerButton>,
}

impl ButtonRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `button` next to its neighbours by `order`.
    ///
    /// Goes right after the rightmost button whose order is not greater;
    /// failing that, right before the leftmost button with a greater order;
    /// failing that (empty row), at the end. Equal orders keep arrival order.
    pub fn insert(&mut self, button: TriggerButton) {
        let position = match self.buttons.iter().rposition(|b| b.order <= button.order) {
            Some(before) => before + 1,
            None => self
                .buttons
                .iter()
                .position(|b| b.order > button.order)
                .unwrap_or(self.buttons.len()),
        };
        self.buttons.insert(position, button);
    }

    pub fn buttons(&self) -> &[TriggerButton] {
        &self.buttons
    }

    pub fn keys(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

/// Everything the loader produced.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Categories in arrival order.
    pub categories: Vec<Category>,
    /// Trigger buttons in display order.
    pub buttons: ButtonRow,
    /// Keys of categories that were dropped, with the reason.
    pub dropped: Vec<(String, String)>,
}

impl Catalog {
    /// List categories and build their buttons.
    ///
    /// Only a failure to list the root prefix is an error; individual
    /// categories fail independently and end up in [`Catalog::dropped`].
    pub async fn load<S: ObjectStore>(
        store: &S,
        config: &StorageConfig,
    ) -> Result<Self, CatalogError> {
        let root = StorageRef::new(&config.root_prefix);
        let folders = store
            .list_folders(&root)
            .await
            .map_err(|e| CatalogError::Listing(root.to_string(), e))?;
        info!(root = %root, count = folders.len(), "listing portfolio categories");

        // Every metadata fetch in flight at once; results arrive as they finish
        let parallelism = folders.len().max(1);
        let mut pending = stream::iter(folders)
            .map(|folder| load_category(store, folder, config))
            .buffer_unordered(parallelism);

        let mut catalog = Catalog::default();
        while let Some(result) = pending.next().await {
            match result {
                Ok((category, button)) => {
                    debug!(key = %category.key, order = category.order, "category ready");
                    catalog.buttons.insert(button);
                    catalog.categories.push(category);
                }
                Err(CatalogError::Metadata(key, err)) => {
                    warn!(category = %key, error = %err, "dropping category");
                    catalog.dropped.push((key, err.to_string()));
                }
                Err(other) => return Err(other),
            }
        }
        info!(
            shown = catalog.categories.len(),
            dropped = catalog.dropped.len(),
            "portfolio catalog loaded"
        );
        Ok(catalog)
    }

    pub fn find(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Categories in button (display) order.
    pub fn in_display_order(&self) -> Vec<&Category> {
        self.buttons
            .buttons()
            .iter()
            .filter_map(|b| self.find(&b.key))
            .collect()
    }
}

async fn load_category<S: ObjectStore>(
    store: &S,
    folder: StorageRef,
    config: &StorageConfig,
) -> Result<(Category, TriggerButton), CatalogError> {
    let key = folder.name().to_string();
    let metadata = fetch_metadata(store, &folder, &config.metadata_file)
        .await
        .map_err(|e| CatalogError::Metadata(key.clone(), e))?;

    let cover_ref = folder.child(&format!("{}{}", metadata.cover, config.cover_extension));
    let cover_url = match store.download_url(&cover_ref).await {
        Ok(url) => Some(url),
        Err(err) => {
            warn!(category = %key, cover = %cover_ref, error = %err, "cover unavailable");
            None
        }
    };

    let category = Category {
        key: key.clone(),
        title: metadata.title.clone(),
        order: metadata.order,
        cover: metadata.cover,
        images: LazyGallery::new(folder, config.image_extensions.clone()),
    };
    let button = TriggerButton {
        key,
        title: metadata.title,
        order: metadata.order,
        cover_url,
    };
    Ok((category, button))
}
