//! Images that belong to the page itself rather than to a category.
//!
//! The logo and similar artwork live in the bucket under
//! `storage.page_prefix`, one `<id>.webp` per image, and the page refers to
//! them by id. Their URLs are resolved once at start-up, all at the same
//! time. An id that cannot be resolved renders without a source.

use crate::config::StorageConfig;
use crate::storage::{ObjectStore, StorageRef};
use futures::future::join_all;
use tracing::{debug, warn};

const PAGE_IMAGE_EXTENSION: &str = ".webp";

/// A page image slot and its resolved URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteImage {
    pub id: String,
    pub src: Option<String>,
}

/// Storage location of page image `id`.
pub fn page_image_ref(config: &StorageConfig, id: &str) -> StorageRef {
    StorageRef::new(&config.page_prefix).child(&format!("{id}{PAGE_IMAGE_EXTENSION}"))
}

/// Resolve every id in `ids`, keeping their order.
pub async fn resolve_page_images<S: ObjectStore>(
    store: &S,
    config: &StorageConfig,
    ids: &[String],
) -> Vec<SiteImage> {
    let lookups = ids.iter().map(|id| async move {
        let object = page_image_ref(config, id);
        match store.download_url(&object).await {
            Ok(src) => {
                debug!(id = %id, "page image resolved");
                SiteImage {
                    id: id.clone(),
                    src: Some(src),
                }
            }
            Err(err) => {
                warn!(id = %id, object = %object, error = %err, "page image unavailable");
                SiteImage {
                    id: id.clone(),
                    src: None,
                }
            }
        }
    });
    join_all(lookups).await
}
