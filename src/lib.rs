//! # Portfolio Carousel
//!
//! The portfolio section of a small bakery's website. Each portfolio
//! category is a folder in an object store; the page shows one trigger
//! button per category and, when a button is clicked, a modal image
//! carousel for that category.
//!
//! # Architecture: Load Once, Open Lazily
//!
//! ```text
//! 1. Catalog   portfolio/*/index.json  →  ordered trigger buttons   (at start-up)
//! 2. Gallery   portfolio/<key>/*       →  image URLs                (on first open)
//! 3. Carousel  user input              →  open / index / closed     (every event)
//! ```
//!
//! Start-up only touches the small metadata documents, so the buttons appear
//! quickly no matter how many images each category holds. Gallery listings
//! are deferred until somebody opens a category and are cached afterwards.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`storage`] | `ObjectStore` seam and the local filesystem backend |
//! | [`metadata`] | Per-category `index.json` fetching and validation |
//! | [`catalog`] | Concurrent catalog load, order-preserving button row |
//! | [`gallery`] | Lazy, cached, deduplicated gallery listing |
//! | [`carousel`] | The carousel state machine and input routing |
//! | [`page_images`] | Page artwork (logo, hero) resolved by id at start-up |
//! | [`render`] | Buttons, modal and page markup using Maud |
//! | [`site`] | Ties catalog, carousel and rendering together for a host page |
//! | [`order`] | WhatsApp order message, deep link, phone mask |
//! | [`filter`] | Flavor list filter and combo suggestion |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`browse`] | Line-oriented carousel driver used by the CLI |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Small shared types (`Image`, `Direction`) |
//!
//! # Design Decisions
//!
//! ## Buttons Are Ordered On Arrival
//!
//! Metadata fetches run concurrently and complete in any order. Instead of
//! waiting for all of them and sorting, each button is inserted at its final
//! position the moment its metadata arrives. The row is correct at every
//! intermediate point, and the final order does not depend on network timing.
//!
//! ## Single-Threaded Async
//!
//! Everything runs on one thread, like the browser event loop it models.
//! Shared caches use `Rc` and `Cell` rather than `Arc` and locks, and the
//! [`storage::ObjectStore`] futures carry no `Send` bound.
//!
//! ## One Controller, No Globals
//!
//! The carousel is an owned [`carousel::Carousel`] value. Every input is a
//! method call on it, and [`render`] only reads it, so the markup can never
//! drift from the state.

pub mod browse;
pub mod carousel;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod gallery;
pub mod metadata;
pub mod order;
pub mod output;
pub mod page_images;
pub mod render;
pub mod site;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
