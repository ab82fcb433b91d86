//! HTML rendering of the portfolio section.
//!
//! Every function here is a pure view over controller and catalog state:
//! given the same state it produces the same markup, and nothing in this
//! module mutates state. Rebuilding the modal after a transition therefore
//! replaces slides and dots wholesale, so a re-opened category can never
//! show leftovers from a previous open.
//!
//! ## Host Element Ids
//!
//! | Id | Element |
//! |----|---------|
//! | `portfolio-buttons` | container of the trigger buttons |
//! | `carouselModal` | modal root, carries `hidden` while closed |
//! | `carouselTitle` | category title heading |
//! | `carouselImages` | slide strip, translated by `-100% × index` |
//! | `dotsContainer` | one dot per slide, the current one `active` |
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) so titles and URLs coming from
//! storage metadata are escaped automatically.

use crate::carousel::{Carousel, slide_offset_percent};
use crate::catalog::{ButtonRow, TriggerButton};
use crate::config::{self, SiteConfig};
use crate::page_images::SiteImage;
use maud::{DOCTYPE, Markup, html};

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Renders the base HTML document structure
fn base_document(config: &SiteConfig, scroll_locked: bool, content: Markup) -> Markup {
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );
    html! {
        (DOCTYPE)
        html lang=(config.site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.site.title) }
                style { (css) }
            }
            body class=[scroll_locked.then_some("scroll-locked")] {
                (content)
            }
        }
    }
}

/// One category button: cover image (when known) with the title as a badge.
pub fn trigger_button(button: &TriggerButton) -> Markup {
    html! {
        button.portfolio-trigger type="button" data-category=(button.key) aria-label=(button.title) {
            @if let Some(url) = &button.cover_url {
                img src=(url) alt=(button.title) loading="lazy";
            }
            span.portfolio-title { (button.title) }
        }
    }
}

/// The trigger buttons in display order.
pub fn button_row(row: &ButtonRow) -> Markup {
    html! {
        div #portfolio-buttons {
            @for button in row.buttons() {
                (trigger_button(button))
            }
        }
    }
}

/// The carousel modal for the controller's current state.
pub fn carousel_modal(carousel: &Carousel) -> Markup {
    let visible = carousel.scroll_locked();
    let index = carousel.current_index();
    let images = carousel.open_gallery().map(|g| &g.images[..]).unwrap_or(&[]);
    let track_style = format!("transform: translateX({}%)", slide_offset_percent(index));

    html! {
        div #carouselModal .carousel-modal .hidden[!visible]
            role="dialog" aria-modal="true" aria-hidden=(if visible { "false" } else { "true" }) {
            div.carousel-backdrop data-action="close" {}
            div.carousel-panel {
                header.carousel-header {
                    h2 #carouselTitle { (carousel.title().unwrap_or_default()) }
                    button.carousel-close type="button" data-action="close" aria-label="Fechar" { "×" }
                }
                @if carousel.is_loading() {
                    p.carousel-loading role="status" { "Carregando…" }
                }
                div.carousel-viewport {
                    div #carouselImages .carousel-track style=(track_style) {
                        @for image in images {
                            div.carousel-slide {
                                img src=(image.src) alt=(image.alt) loading="lazy";
                            }
                        }
                    }
                    button.carousel-prev type="button" data-action="prev" aria-label="Anterior" { "‹" }
                    button.carousel-next type="button" data-action="next" aria-label="Próximo" { "›" }
                }
                div #dotsContainer .carousel-dots {
                    @for i in 0..images.len() {
                        button.carousel-dot .active[i == index] type="button"
                            data-index=(i) aria-label={ "Ir para imagem " (i + 1) } {}
                    }
                }
                a.carousel-cta href="#pedido" data-action="order" { "Fazer pedido" }
            }
        }
    }
}

/// Page artwork, one `img` per id; the id doubles as the element id.
pub fn page_images(images: &[SiteImage]) -> Markup {
    html! {
        @if !images.is_empty() {
            header.site-images {
                @for image in images {
                    img id=(image.id) src=[image.src.as_deref()] alt=(image.id);
                }
            }
        }
    }
}

/// A transient status message, e.g. after a failed open.
pub fn notice(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p.notice role="status" { (message) }
        }
    }
}

/// Complete page: page images, trigger buttons, modal, and any pending notice.
pub fn render_page(
    config: &SiteConfig,
    images: &[SiteImage],
    buttons: &ButtonRow,
    carousel: &Carousel,
) -> Markup {
    let content = html! {
        (page_images(images))
        main {
            section #portfolio {
                h1 { (config.site.title) }
                (button_row(buttons))
            }
        }
        (carousel_modal(carousel))
        (notice(carousel.notice()))
    };
    base_document(config, carousel.scroll_locked(), content)
}
