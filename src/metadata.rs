//! Category metadata documents.
//!
//! Every category folder carries a small JSON document next to its images:
//!
//! ```json
//! { "title": "Bolos de Festa", "order": 0, "cover": "capa" }
//! ```
//!
//! - **title**: display name on the trigger button and carousel header
//! - **order**: left-to-right position of the button (ascending)
//! - **cover**: filename stem of the cover image; the configured cover
//!   extension is appended (`capa` → `capa.webp`)
//!
//! Extra keys are ignored so content owners can annotate freely. A missing
//! or malformed document removes the category from the page.

use crate::storage::{ObjectStore, StorageError, StorageRef};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("metadata unavailable: {0}")]
    Storage(#[from] StorageError),
    #[error("malformed metadata: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("metadata field `{0}` is empty")]
    EmptyField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryMetadata {
    pub title: String,
    pub order: i64,
    pub cover: String,
}

/// Parse and check a metadata document.
pub fn parse_metadata(bytes: &[u8]) -> Result<CategoryMetadata, MetadataError> {
    let metadata: CategoryMetadata = serde_json::from_slice(bytes)?;
    if metadata.title.trim().is_empty() {
        return Err(MetadataError::EmptyField("title"));
    }
    if metadata.cover.trim().is_empty() {
        return Err(MetadataError::EmptyField("cover"));
    }
    Ok(metadata)
}

/// Read `<folder>/<file_name>` from the store and parse it.
pub async fn fetch_metadata<S: ObjectStore>(
    store: &S,
    folder: &StorageRef,
    file_name: &str,
) -> Result<CategoryMetadata, MetadataError> {
    let bytes = store.get_content(&folder.child(file_name)).await?;
    parse_metadata(&bytes)
}
