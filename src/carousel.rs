//! Carousel controller.
//!
//! Owns the transient UI state of the category gallery modal and is the only
//! place that state changes. Every input (keys, on-screen arrows, dots,
//! swipes, backdrop clicks) is routed through the transition functions
//! below; rendering reads the state and never writes it.
//!
//! ## States
//!
//! ```text
//!            begin_open             finish_open (n > 0)
//! Closed ───────────────▶ Loading ───────────────────────▶ Open(category, index)
//!   ▲                        │   finish_open (n = 0)            │
//!   │                        └──────── or timeout ──────────────┤
//!   └───────────────────────────── close ───────────────────────┘
//! ```
//!
//! `index` always lies in `0..n` while open; `next`/`previous` wrap with
//! modulo arithmetic in both directions.
//!
//! ## Overlapping Opens
//!
//! Opening is two-phase so the caller can await the gallery in between.
//! Each [`Carousel::begin_open`] hands out a [`LoadTicket`]; only the most
//! recent ticket may complete. A slow category opened first can therefore
//! never replace a faster one opened after it, and a close while loading
//! discards the load entirely.
//!
//! Beginning an open drops whatever gallery was showing, so the modal never
//! pairs the new category's title with the old category's slides.
//!
//! [`Carousel::open`] runs both phases back to back. A host that needs to
//! keep handling input while a gallery loads calls [`Carousel::begin_open`],
//! awaits [`load_gallery`] itself, then hands the result to
//! [`Carousel::settle`].

use crate::catalog::Category;
use crate::config::CarouselConfig;
use crate::gallery::LazyGallery;
use crate::storage::ObjectStore;
use crate::types::{Direction, Image};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Keys the carousel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// User input delivered by the host page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(Key),
    PreviousButton,
    NextButton,
    Dot(usize),
    TouchStart { x: f64 },
    TouchEnd { x: f64 },
    Backdrop,
    CloseButton,
    /// The "place an order" link inside the modal.
    OrderLink,
}

/// Identifies one open request; see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Result of completing an open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Gallery shown with this many slides.
    Opened(usize),
    /// The gallery has no images; the carousel stays closed.
    Empty,
    /// A newer open or a close superseded this request.
    Stale,
    /// The gallery did not load in time.
    TimedOut,
}

/// Category currently shown.
#[derive(Debug, Clone)]
pub struct OpenGallery {
    pub key: String,
    pub title: String,
    pub images: Rc<[Image]>,
}

#[derive(Debug, Clone)]
struct PendingOpen {
    ticket: LoadTicket,
    key: String,
    title: String,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    swipe_threshold: f64,
    load_timeout: Duration,
    open: Option<OpenGallery>,
    index: usize,
    pending: Option<PendingOpen>,
    next_ticket: u64,
    touch_start_x: Option<f64>,
    notice: Option<String>,
}

const EMPTY_GALLERY_NOTICE: &str = "Nenhuma imagem disponível nesta categoria.";
const TIMEOUT_NOTICE: &str = "Não foi possível carregar as imagens. Tente novamente.";

impl Carousel {
    pub fn new(config: &CarouselConfig) -> Self {
        Self {
            swipe_threshold: f64::from(config.swipe_threshold_px),
            load_timeout: config.load_timeout(),
            open: None,
            index: 0,
            pending: None,
            next_ticket: 0,
            touch_start_x: None,
            notice: None,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Background page scroll is suppressed while the modal shows.
    pub fn scroll_locked(&self) -> bool {
        self.is_open() || self.is_loading()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn open_gallery(&self) -> Option<&OpenGallery> {
        self.open.as_ref()
    }

    pub fn slide_count(&self) -> usize {
        self.open.as_ref().map_or(0, |g| g.images.len())
    }

    /// Title for the modal header: the loading category wins over the open one.
    pub fn title(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .map(|p| p.title.as_str())
            .or_else(|| self.open.as_ref().map(|g| g.title.as_str()))
    }

    pub fn load_timeout(&self) -> Duration {
        self.load_timeout
    }

    /// User-visible message left by the last failed or empty open.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // ------------------------------------------------------------------
    // Opening
    // ------------------------------------------------------------------

    /// Start opening `category`, superseding any earlier pending open.
    ///
    /// The currently shown gallery, if any, is dropped straight away.
    pub fn begin_open(&mut self, category: &Category) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        debug!(key = %category.key, ticket = ticket.0, "opening category");
        self.open = None;
        self.index = 0;
        self.touch_start_x = None;
        self.pending = Some(PendingOpen {
            ticket,
            key: category.key.clone(),
            title: category.title.clone(),
        });
        self.notice = None;
        ticket
    }

    /// Complete an open with the resolved gallery.
    ///
    /// Slides and dots are rebuilt from `images`; nothing from a previous
    /// open survives.
    pub fn finish_open(&mut self, ticket: LoadTicket, images: Rc<[Image]>) -> OpenOutcome {
        let Some(pending) = self.take_pending(ticket) else {
            debug!(ticket = ticket.0, "discarding stale gallery load");
            return OpenOutcome::Stale;
        };

        if images.is_empty() {
            info!(key = %pending.key, "category has no images");
            self.reset();
            self.notice = Some(EMPTY_GALLERY_NOTICE.to_string());
            return OpenOutcome::Empty;
        }

        let count = images.len();
        self.open = Some(OpenGallery {
            key: pending.key,
            title: pending.title,
            images,
        });
        self.index = 0;
        self.touch_start_x = None;
        OpenOutcome::Opened(count)
    }

    /// Abandon a pending open with a user-visible reason.
    pub fn fail_open(&mut self, ticket: LoadTicket, reason: &str) -> OpenOutcome {
        let Some(pending) = self.take_pending(ticket) else {
            return OpenOutcome::Stale;
        };
        warn!(key = %pending.key, reason, "category failed to open");
        self.reset();
        self.notice = Some(reason.to_string());
        OpenOutcome::TimedOut
    }

    /// Complete an open with the result of [`load_gallery`]; `None` means the
    /// load timed out.
    pub fn settle(&mut self, ticket: LoadTicket, images: Option<Rc<[Image]>>) -> OpenOutcome {
        match images {
            Some(images) => self.finish_open(ticket, images),
            None => self.fail_open(ticket, TIMEOUT_NOTICE),
        }
    }

    /// Open `category`, loading its gallery from `store` if needed.
    pub async fn open<S: ObjectStore>(&mut self, store: &S, category: &Category) -> OpenOutcome {
        let ticket = self.begin_open(category);
        let images = load_gallery(store, &category.images, self.load_timeout).await;
        self.settle(ticket, images)
    }

    fn take_pending(&mut self, ticket: LoadTicket) -> Option<PendingOpen> {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => self.pending.take(),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Move one slide, wrapping at both ends. Returns whether anything moved.
    pub fn change_slide(&mut self, direction: Direction) -> bool {
        let count = self.slide_count();
        if count == 0 {
            return false;
        }
        self.index = wrap_index(self.index, direction.step(), count);
        true
    }

    pub fn next(&mut self) -> bool {
        self.change_slide(Direction::Next)
    }

    pub fn previous(&mut self) -> bool {
        self.change_slide(Direction::Previous)
    }

    /// Jump straight to `index`; ignored when closed or out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.slide_count() {
            return false;
        }
        self.index = index;
        true
    }

    /// Close the modal, dropping slides, dots and any pending open.
    pub fn close(&mut self) -> bool {
        let was_visible = self.scroll_locked();
        self.reset();
        self.notice = None;
        was_visible
    }

    fn reset(&mut self) {
        self.open = None;
        self.pending = None;
        self.index = 0;
        self.touch_start_x = None;
    }

    // ------------------------------------------------------------------
    // Input routing
    // ------------------------------------------------------------------

    /// Route one input event. Returns whether the state changed.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => {
                if !self.is_open() {
                    return false;
                }
                match key {
                    Key::ArrowLeft => self.previous(),
                    Key::ArrowRight => self.next(),
                    Key::Escape => self.close(),
                    Key::Other => false,
                }
            }
            InputEvent::PreviousButton => self.previous(),
            InputEvent::NextButton => self.next(),
            InputEvent::Dot(index) => self.go_to(index),
            InputEvent::TouchStart { x } => {
                if self.is_open() {
                    self.touch_start_x = Some(x);
                }
                false
            }
            InputEvent::TouchEnd { x } => match self.touch_start_x.take() {
                Some(start) => match swipe_direction(start, x, self.swipe_threshold) {
                    Some(direction) => self.change_slide(direction),
                    None => false,
                },
                None => false,
            },
            InputEvent::Backdrop | InputEvent::CloseButton | InputEvent::OrderLink => self.close(),
        }
    }
}

/// Resolve `gallery` within `timeout`. `None` when the time ran out.
///
/// An abandoned load leaves the gallery retryable; see [`LazyGallery`].
pub async fn load_gallery<S: ObjectStore>(
    store: &S,
    gallery: &LazyGallery,
    timeout: Duration,
) -> Option<Rc<[Image]>> {
    tokio::time::timeout(timeout, gallery.images(store)).await.ok()
}

/// `(index + step) mod count`, always non-negative. `count` must be non-zero.
pub fn wrap_index(index: usize, step: i64, count: usize) -> usize {
    let count = count as i64;
    (index as i64 + step).rem_euclid(count) as usize
}

/// Classify a horizontal touch gesture.
///
/// Travel must strictly exceed `threshold`: leftward travel means next,
/// rightward means previous.
pub fn swipe_direction(start_x: f64, end_x: f64, threshold: f64) -> Option<Direction> {
    if end_x < start_x - threshold {
        Some(Direction::Next)
    } else if end_x > start_x + threshold {
        Some(Direction::Previous)
    } else {
        None
    }
}

/// Horizontal translation of the slide strip, in percent.
pub fn slide_offset_percent(index: usize) -> i64 {
    -(index as i64) * 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::GalleryState;
    use crate::test_helpers::{MemoryStore, category, images, lazy_category};

    fn carousel() -> Carousel {
        Carousel::new(&CarouselConfig::default())
    }

    fn open_with(carousel: &mut Carousel, count: usize) {
        let cat = category("bolos", count);
        let ticket = carousel.begin_open(&cat);
        carousel.finish_open(ticket, Rc::from(images(count)));
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    #[test]
    fn wrap_index_wraps_both_ways() {
        assert_eq!(wrap_index(0, -1, 4), 3);
        assert_eq!(wrap_index(3, 1, 4), 0);
        assert_eq!(wrap_index(1, 1, 4), 2);
        assert_eq!(wrap_index(0, 1, 1), 0);
    }

    #[test]
    fn slide_offset_is_minus_hundred_per_slide() {
        assert_eq!(slide_offset_percent(0), 0);
        assert_eq!(slide_offset_percent(1), -100);
        assert_eq!(slide_offset_percent(4), -400);
    }

    #[test]
    fn swipe_threshold_boundary() {
        assert_eq!(swipe_direction(100.0, 51.0, 50.0), None); // 49px
        assert_eq!(swipe_direction(100.0, 50.0, 50.0), None); // exactly 50px
        assert_eq!(swipe_direction(100.0, 49.0, 50.0), Some(Direction::Next)); // 51px
        assert_eq!(swipe_direction(100.0, 149.0, 50.0), None);
        assert_eq!(
            swipe_direction(100.0, 151.0, 50.0),
            Some(Direction::Previous)
        );
    }

    // =========================================================================
    // Open / close
    // =========================================================================

    #[test]
    fn starts_closed() {
        let c = carousel();
        assert!(!c.is_open());
        assert!(!c.scroll_locked());
        assert_eq!(c.current_index(), 0);
        assert_eq!(c.slide_count(), 0);
    }

    #[test]
    fn open_shows_first_slide_and_locks_scroll() {
        let mut c = carousel();
        let cat = category("bolos", 3);
        let ticket = c.begin_open(&cat);
        assert!(c.is_loading());
        assert!(c.scroll_locked());
        assert_eq!(c.title(), Some("BOLOS"));

        let outcome = c.finish_open(ticket, cat.images.cached().unwrap());

        assert_eq!(outcome, OpenOutcome::Opened(3));
        assert!(c.is_open());
        assert!(!c.is_loading());
        assert_eq!(c.current_index(), 0);
        assert_eq!(c.slide_count(), 3);
    }

    #[test]
    fn close_resets_everything() {
        let mut c = carousel();
        open_with(&mut c, 3);
        c.next();
        assert!(c.close());
        assert!(!c.is_open());
        assert!(!c.scroll_locked());
        assert_eq!(c.current_index(), 0);
        assert_eq!(c.slide_count(), 0);
    }

    #[test]
    fn close_when_closed_is_noop() {
        let mut c = carousel();
        assert!(!c.close());
    }

    #[test]
    fn reopen_rebuilds_instead_of_accumulating() {
        let mut c = carousel();
        open_with(&mut c, 4);
        c.close();
        open_with(&mut c, 4);
        assert_eq!(c.slide_count(), 4);
    }

    #[test]
    fn empty_gallery_open_is_noop() {
        let mut c = carousel();
        let cat = category("vazio", 0);
        let ticket = c.begin_open(&cat);
        let outcome = c.finish_open(ticket, Rc::from(Vec::new()));

        assert_eq!(outcome, OpenOutcome::Empty);
        assert!(!c.is_open());
        assert!(!c.scroll_locked());
        assert!(c.notice().is_some());
        assert!(!c.next());
        assert!(!c.previous());
        assert!(!c.go_to(0));
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut c = carousel();
        let slow = category("lento", 5);
        let fast = category("rapido", 2);

        let slow_ticket = c.begin_open(&slow);
        let fast_ticket = c.begin_open(&fast);

        assert_eq!(
            c.finish_open(fast_ticket, fast.images.cached().unwrap()),
            OpenOutcome::Opened(2)
        );
        assert_eq!(
            c.finish_open(slow_ticket, slow.images.cached().unwrap()),
            OpenOutcome::Stale
        );
        assert_eq!(c.open_gallery().unwrap().key, "rapido");
        assert_eq!(c.slide_count(), 2);
    }

    #[test]
    fn close_while_loading_discards_load() {
        let mut c = carousel();
        let cat = category("bolos", 3);
        let ticket = c.begin_open(&cat);
        c.close();
        assert_eq!(
            c.finish_open(ticket, cat.images.cached().unwrap()),
            OpenOutcome::Stale
        );
        assert!(!c.is_open());
    }

    #[test]
    fn opening_another_category_replaces_current() {
        let mut c = carousel();
        open_with(&mut c, 3);
        c.next();
        c.next();
        let other = category("doces", 2);
        let ticket = c.begin_open(&other);
        c.finish_open(ticket, other.images.cached().unwrap());
        assert_eq!(c.open_gallery().unwrap().key, "doces");
        assert_eq!(c.current_index(), 0);
    }

    #[tokio::test]
    async fn open_loads_lazy_gallery_from_store() {
        let store = MemoryStore::new().with_category("bolos", "Bolos", 0, &["01.jpg", "02.png"]);
        let mut c = carousel();
        let cat = lazy_category("bolos");

        let outcome = c.open(&store, &cat).await;

        // capa.webp is an image in the folder too
        assert_eq!(outcome, OpenOutcome::Opened(3));
        assert_eq!(c.open_gallery().unwrap().images[0].alt, "01.jpg");
    }

    #[tokio::test(start_paused = true)]
    async fn open_times_out_with_notice() {
        let store = MemoryStore::new()
            .with_category("bolos", "Bolos", 0, &["01.jpg"])
            .with_delay("portfolio/bolos", Duration::from_secs(60));
        let mut c = carousel();
        let cat = lazy_category("bolos");

        let outcome = c.open(&store, &cat).await;

        assert_eq!(outcome, OpenOutcome::TimedOut);
        assert!(!c.is_open());
        assert!(!c.scroll_locked());
        assert_eq!(c.notice(), Some(TIMEOUT_NOTICE));
        assert_eq!(cat.images.state(), GalleryState::NotRequested);
    }

    #[tokio::test(start_paused = true)]
    async fn reopen_after_timeout_lists_again() {
        let store = MemoryStore::new()
            .with_category("bolos", "Bolos", 0, &["01.jpg"])
            .with_delay("portfolio/bolos", Duration::from_secs(25));
        let mut c = carousel();
        let cat = lazy_category("bolos");

        assert_eq!(c.open(&store, &cat).await, OpenOutcome::TimedOut);
        let ticket = c.begin_open(&cat);
        let images = load_gallery(&store, &cat.images, Duration::from_secs(60)).await;

        assert_eq!(c.settle(ticket, images), OpenOutcome::Opened(2));
        assert_eq!(cat.images.state(), GalleryState::Resolved(2));
        assert_eq!(store.list_calls(), 2);
    }

    #[test]
    fn switching_category_drops_shown_slides_while_loading() {
        let mut c = carousel();
        open_with(&mut c, 3);
        c.next();

        c.begin_open(&category("doces", 2));

        assert!(c.is_loading());
        assert!(!c.is_open());
        assert!(c.scroll_locked());
        assert_eq!(c.slide_count(), 0);
        assert_eq!(c.current_index(), 0);
        assert_eq!(c.title(), Some("DOCES"));
        assert!(!c.next());
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn next_and_previous_wrap() {
        let mut c = carousel();
        open_with(&mut c, 3);
        c.previous();
        assert_eq!(c.current_index(), 2);
        c.next();
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn n_steps_return_to_start() {
        for n in 1..=6 {
            for start in 0..n {
                for direction in [Direction::Next, Direction::Previous] {
                    let mut c = carousel();
                    open_with(&mut c, n);
                    c.go_to(start);
                    for _ in 0..n {
                        c.change_slide(direction);
                    }
                    assert_eq!(c.current_index(), start, "n={n} start={start}");
                }
            }
        }
    }

    #[test]
    fn navigation_when_closed_is_noop() {
        let mut c = carousel();
        assert!(!c.next());
        assert!(!c.previous());
        assert!(!c.go_to(0));
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn go_to_ignores_out_of_range() {
        let mut c = carousel();
        open_with(&mut c, 3);
        assert!(c.go_to(2));
        assert!(!c.go_to(3));
        assert_eq!(c.current_index(), 2);
    }

    // =========================================================================
    // Input routing
    // =========================================================================

    #[test]
    fn arrow_keys_navigate_only_when_open() {
        let mut c = carousel();
        assert!(!c.handle(InputEvent::Key(Key::ArrowRight)));

        open_with(&mut c, 3);
        c.handle(InputEvent::Key(Key::ArrowRight));
        assert_eq!(c.current_index(), 1);
        c.handle(InputEvent::Key(Key::ArrowLeft));
        c.handle(InputEvent::Key(Key::ArrowLeft));
        assert_eq!(c.current_index(), 2);
        assert!(!c.handle(InputEvent::Key(Key::Other)));
    }

    #[test]
    fn escape_closes() {
        let mut c = carousel();
        open_with(&mut c, 3);
        assert!(c.handle(InputEvent::Key(Key::Escape)));
        assert!(!c.is_open());
    }

    #[test]
    fn buttons_and_dots_navigate() {
        let mut c = carousel();
        open_with(&mut c, 4);
        c.handle(InputEvent::NextButton);
        c.handle(InputEvent::NextButton);
        assert_eq!(c.current_index(), 2);
        c.handle(InputEvent::PreviousButton);
        assert_eq!(c.current_index(), 1);
        c.handle(InputEvent::Dot(3));
        assert_eq!(c.current_index(), 3);
    }

    #[test]
    fn backdrop_close_button_and_order_link_close() {
        for event in [
            InputEvent::Backdrop,
            InputEvent::CloseButton,
            InputEvent::OrderLink,
        ] {
            let mut c = carousel();
            open_with(&mut c, 2);
            assert!(c.handle(event));
            assert!(!c.is_open());
        }
    }

    #[test]
    fn swipe_left_past_threshold_advances() {
        let mut c = carousel();
        open_with(&mut c, 3);
        c.handle(InputEvent::TouchStart { x: 100.0 });
        assert!(c.handle(InputEvent::TouchEnd { x: 49.0 }));
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn short_swipe_does_nothing() {
        let mut c = carousel();
        open_with(&mut c, 3);
        c.handle(InputEvent::TouchStart { x: 100.0 });
        assert!(!c.handle(InputEvent::TouchEnd { x: 51.0 }));
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn swipe_right_goes_back() {
        let mut c = carousel();
        open_with(&mut c, 3);
        c.handle(InputEvent::TouchStart { x: 10.0 });
        c.handle(InputEvent::TouchEnd { x: 200.0 });
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn touch_end_without_start_is_ignored() {
        let mut c = carousel();
        open_with(&mut c, 3);
        assert!(!c.handle(InputEvent::TouchEnd { x: 0.0 }));
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn swipe_threshold_follows_config() {
        let mut c = Carousel::new(&CarouselConfig {
            swipe_threshold_px: 10,
            load_timeout_secs: 1,
        });
        open_with(&mut c, 3);
        c.handle(InputEvent::TouchStart { x: 100.0 });
        c.handle(InputEvent::TouchEnd { x: 89.0 });
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn key_names_map_from_dom() {
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }
}
