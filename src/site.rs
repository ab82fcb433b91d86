//! The portfolio section as a whole.
//!
//! [`Site`] is what a host page talks to: it loads the catalog once, owns
//! the single carousel controller, routes user input to it, and renders the
//! current state. There is exactly one carousel per site and no global state.
//!
//! ## Opening Without Blocking Input
//!
//! [`Site::open`] holds the site for the whole gallery load. A host that
//! keeps routing input meanwhile (a second button click, Escape) uses the
//! split form instead:
//!
//! ```text
//! let (ticket, gallery) = site.begin_open("bolos")?;   // modal shows "loading"
//! let images = site.load(&gallery).await;              // site only borrowed
//! site.finish_open(ticket, images);                    // Stale if superseded
//! ```

use crate::carousel::{self, Carousel, InputEvent, LoadTicket, OpenOutcome};
use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::gallery::LazyGallery;
use crate::page_images::{self, SiteImage};
use crate::render;
use crate::storage::ObjectStore;
use crate::types::{Direction, Image};
use maud::Markup;
use std::rc::Rc;
use tracing::{error, warn};

pub struct Site<S> {
    store: S,
    config: SiteConfig,
    catalog: Catalog,
    page_images: Vec<SiteImage>,
    carousel: Carousel,
}

impl<S: ObjectStore> Site<S> {
    /// Load the catalog and page images, and set up the (closed) carousel.
    ///
    /// Never fails: if the category root cannot be listed the page comes up
    /// with no trigger buttons.
    pub async fn init(store: S, config: SiteConfig) -> Self {
        let (catalog, page_images) = futures::join!(
            Catalog::load(&store, &config.storage),
            page_images::resolve_page_images(&store, &config.storage, &config.site.images),
        );
        let catalog = catalog.unwrap_or_else(|err| {
            error!(error = %err, "portfolio unavailable");
            Catalog::default()
        });
        let carousel = Carousel::new(&config.carousel);
        Self {
            store,
            config,
            catalog,
            page_images,
            carousel,
        }
    }

    /// Open the category behind trigger button `key`.
    ///
    /// Returns `None` for a key that is not in the catalog.
    pub async fn open(&mut self, key: &str) -> Option<OpenOutcome> {
        let (ticket, gallery) = self.begin_open(key)?;
        let images = self.load(&gallery).await;
        Some(self.finish_open(ticket, images))
    }

    /// First half of [`Site::open`]: show the loading modal for `key` and
    /// hand back what to load.
    pub fn begin_open(&mut self, key: &str) -> Option<(LoadTicket, LazyGallery)> {
        let Some(category) = self.catalog.find(key) else {
            warn!(key, "no such category");
            return None;
        };
        let ticket = self.carousel.begin_open(category);
        Some((ticket, category.images.clone()))
    }

    /// Resolve a gallery within the configured timeout. `None` on timeout.
    pub async fn load(&self, gallery: &LazyGallery) -> Option<Rc<[Image]>> {
        carousel::load_gallery(&self.store, gallery, self.carousel.load_timeout()).await
    }

    /// Second half of [`Site::open`].
    pub fn finish_open(&mut self, ticket: LoadTicket, images: Option<Rc<[Image]>>) -> OpenOutcome {
        self.carousel.settle(ticket, images)
    }

    pub fn change_slide(&mut self, direction: Direction) -> bool {
        self.carousel.change_slide(direction)
    }

    pub fn handle(&mut self, event: InputEvent) -> bool {
        self.carousel.handle(event)
    }

    pub fn render(&self) -> Markup {
        render::render_page(
            &self.config,
            &self.page_images,
            &self.catalog.buttons,
            &self.carousel,
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn page_images(&self) -> &[SiteImage] {
        &self.page_images
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}
