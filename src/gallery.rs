//! Lazily loaded category galleries.
//!
//! Listing a category's images costs one folder listing plus one URL
//! resolution per image, so it only happens when somebody opens that
//! category. The result is cached: the first open pays, later opens reuse
//! it, and a second open arriving while the first is still listing waits on
//! the same load instead of starting another.
//!
//! ```text
//! NotRequested ──images()──▶ InFlight ──▶ Resolved(n)
//!                                    └──▶ Failed        (listing error; empty gallery)
//! ```
//!
//! A load that is abandoned mid-way (its caller timed out) falls back to
//! `NotRequested`, and the next request starts over.
//!
//! Failures below the listing are per image: an object whose URL cannot be
//! resolved is skipped and the gallery simply has fewer slides.

use crate::storage::{ObjectStore, StorageError, StorageRef};
use crate::types::Image;
use futures::future::join_all;
use std::cell::Cell;
use std::rc::Rc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryState {
    NotRequested,
    InFlight,
    Resolved(usize),
    Failed,
}

/// Deferred, cached image list for one category folder.
///
/// Clones share the same cache.
#[derive(Debug, Clone)]
pub struct LazyGallery {
    inner: Rc<GalleryInner>,
}

#[derive(Debug)]
struct GalleryInner {
    folder: StorageRef,
    extensions: Vec<String>,
    state: Cell<GalleryState>,
    images: OnceCell<Rc<[Image]>>,
}

impl LazyGallery {
    pub fn new(folder: StorageRef, extensions: Vec<String>) -> Self {
        Self {
            inner: Rc::new(GalleryInner {
                folder,
                extensions,
                state: Cell::new(GalleryState::NotRequested),
                images: OnceCell::new(),
            }),
        }
    }

    /// A gallery whose images are already known.
    pub fn resolved(folder: StorageRef, images: Vec<Image>) -> Self {
        let count = images.len();
        Self {
            inner: Rc::new(GalleryInner {
                folder,
                extensions: Vec::new(),
                state: Cell::new(GalleryState::Resolved(count)),
                images: OnceCell::from(Rc::<[Image]>::from(images)),
            }),
        }
    }

    pub fn state(&self) -> GalleryState {
        self.inner.state.get()
    }

    /// Images if the gallery has already settled.
    pub fn cached(&self) -> Option<Rc<[Image]>> {
        self.inner.images.get().cloned()
    }

    /// Resolve the gallery, listing the folder on first use.
    ///
    /// Never fails: a listing error yields an empty gallery and the
    /// [`GalleryState::Failed`] state.
    pub async fn images<S: ObjectStore>(&self, store: &S) -> Rc<[Image]> {
        let inner = &self.inner;
        let images = inner
            .images
            .get_or_init(|| async {
                let in_flight = InFlight::start(&inner.state);
                debug!(folder = %inner.folder, "listing gallery");
                match list_gallery(store, &inner.folder, &inner.extensions).await {
                    Ok(images) => {
                        info!(folder = %inner.folder, count = images.len(), "gallery ready");
                        in_flight.settle(GalleryState::Resolved(images.len()));
                        Rc::from(images)
                    }
                    Err(err) => {
                        warn!(folder = %inner.folder, error = %err, "gallery listing failed");
                        in_flight.settle(GalleryState::Failed);
                        Rc::from(Vec::new())
                    }
                }
            })
            .await;
        Rc::clone(images)
    }
}

/// Marks a gallery `InFlight` for as long as its load is alive.
///
/// Dropped without [`InFlight::settle`] (the load future was cancelled), it
/// resets the state to `NotRequested`.
struct InFlight<'a> {
    state: &'a Cell<GalleryState>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn start(state: &'a Cell<GalleryState>) -> Self {
        state.set(GalleryState::InFlight);
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, outcome: GalleryState) {
        self.state.set(outcome);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.set(GalleryState::NotRequested);
        }
    }
}

/// Case-sensitive suffix match against the extension allow-list.
pub fn is_image(name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// List `folder`, keep recognized images, and resolve each to a public URL.
///
/// Images keep listing order. URL resolutions run concurrently and all of
/// them settle before this returns.
pub async fn list_gallery<S: ObjectStore>(
    store: &S,
    folder: &StorageRef,
    extensions: &[String],
) -> Result<Vec<Image>, StorageError> {
    let objects = store.list_objects(folder).await?;
    let candidates: Vec<StorageRef> = objects
        .into_iter()
        .filter(|object| is_image(object.name(), extensions))
        .collect();

    let resolved = join_all(candidates.iter().map(|object| async move {
        (object, store.download_url(object).await)
    }))
    .await;

    let mut images = Vec::with_capacity(resolved.len());
    for (object, result) in resolved {
        match result {
            Ok(src) => images.push(Image {
                src,
                alt: object.name().to_string(),
            }),
            Err(err) => warn!(object = %object, error = %err, "skipping unresolvable image"),
        }
    }
    Ok(images)
}
