//! CLI output formatting.
//!
//! Output is **information-centric**: every category leads with its
//! positional index and title, with storage keys and URLs shown as indented
//! context lines underneath.
//!
//! # Output Format
//!
//! ## Catalog
//!
//! ```text
//! Categories
//! 001 Doces (order 0)
//!     Key: doces
//!     Cover: /media/portfolio/doces/capa.webp
//! 002 Bolos (order 1)
//!     Key: bolos
//!     Cover: (missing)
//!
//! Dropped
//!     rascunho: metadata unavailable: Object not found: portfolio/rascunho/index.json
//! ```
//!
//! ## Carousel
//!
//! ```text
//! Bolos [2/3]
//!     ○ ● ○
//!     Image: 02-morango.png
//!     Source: /media/portfolio/bolos/02-morango.png
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::carousel::Carousel;
use crate::catalog::Catalog;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// One glyph per slide, the current one filled.
fn dots_line(count: usize, current: usize) -> String {
    (0..count)
        .map(|i| if i == current { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Catalog
// ============================================================================

/// Format the loaded catalog in button order, followed by dropped categories.
pub fn format_catalog_output(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];

    if catalog.buttons.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, button) in catalog.buttons.buttons().iter().enumerate() {
        lines.push(format!(
            "{} {} (order {})",
            format_index(i + 1),
            button.title,
            button.order
        ));
        lines.push(format!("{}Key: {}", indent(1), button.key));
        let cover = button.cover_url.as_deref().unwrap_or("(missing)");
        lines.push(format!("{}Cover: {}", indent(1), cover));
    }

    if !catalog.dropped.is_empty() {
        lines.push(String::new());
        lines.push("Dropped".to_string());
        for (key, reason) in &catalog.dropped {
            lines.push(format!("{}{}: {}", indent(1), key, reason));
        }
    }
    lines
}

pub fn print_catalog_output(catalog: &Catalog) {
    for line in format_catalog_output(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Carousel
// ============================================================================

/// Format the carousel as the page would currently show it.
pub fn format_carousel_state(carousel: &Carousel) -> Vec<String> {
    let mut lines = Vec::new();

    match carousel.open_gallery() {
        Some(gallery) => {
            let index = carousel.current_index();
            let count = gallery.images.len();
            lines.push(format!("{} [{}/{}]", gallery.title, index + 1, count));
            lines.push(format!("{}{}", indent(1), dots_line(count, index)));
            if let Some(image) = gallery.images.get(index) {
                lines.push(format!("{}Image: {}", indent(1), image.alt));
                lines.push(format!("{}Source: {}", indent(1), image.src));
            }
        }
        None if carousel.is_loading() => {
            lines.push(format!("Loading {}", carousel.title().unwrap_or_default()));
        }
        None => lines.push("Closed".to_string()),
    }

    if let Some(notice) = carousel.notice() {
        lines.push(format!("{}Notice: {}", indent(1), notice));
    }
    lines
}

pub fn print_carousel_state(carousel: &Carousel) {
    for line in format_carousel_state(carousel) {
        println!("{}", line);
    }
}
