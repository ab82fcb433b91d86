//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a user `config.toml` placed in the site root (the directory
//! that mirrors the storage bucket).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [storage]
//! root_prefix = "portfolio"      # Folder holding one sub-folder per category
//! metadata_file = "index.json"   # Per-category metadata document
//! image_extensions = [".webp", ".png", ".jpg"]  # Case-sensitive allow-list
//! cover_extension = ".webp"      # Appended to the metadata `cover` stem
//! public_base_url = "/media"     # Where the bucket is served from
//! page_prefix = "site"           # Folder holding page images (`<id>.webp`)
//!
//! [carousel]
//! swipe_threshold_px = 50        # Horizontal travel a swipe must exceed
//! load_timeout_secs = 20         # Give up on a gallery after this long
//!
//! [order]
//! whatsapp_number = "5511988137150"
//! business_name = "Lubô Confeitaria"
//!
//! [site]
//! title = "Lubô Confeitaria"
//! language = "pt-BR"
//! images = []                    # Page image ids resolved from page_prefix
//!
//! [colors]
//! terracotta = "#c0623f"
//! cream = "#f7efe4"
//! deep = "#3d2b22"
//! white = "#fffdf9"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [carousel]
//! load_timeout_secs = 5
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where categories live in the object store and how they are read.
    pub storage: StorageConfig,
    /// Carousel input and loading behaviour.
    pub carousel: CarouselConfig,
    /// Order form deep-link settings.
    pub order: OrderConfig,
    /// Page-level settings (document title, language).
    pub site: PageConfig,
    /// Brand palette, emitted as CSS custom properties.
    pub colors: ColorPalette,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.root_prefix.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "storage.root_prefix must not be empty".into(),
            ));
        }
        if self.storage.metadata_file.is_empty() || self.storage.metadata_file.contains('/') {
            return Err(ConfigError::Validation(
                "storage.metadata_file must be a plain file name".into(),
            ));
        }
        if self.storage.image_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "storage.image_extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .storage
            .image_extensions
            .iter()
            .chain(std::iter::once(&self.storage.cover_extension))
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(ConfigError::Validation(format!(
                "extension {ext:?} must start with '.'"
            )));
        }
        if self.carousel.swipe_threshold_px == 0 {
            return Err(ConfigError::Validation(
                "carousel.swipe_threshold_px must be non-zero".into(),
            ));
        }
        if self.carousel.load_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "carousel.load_timeout_secs must be non-zero".into(),
            ));
        }
        if self.order.whatsapp_number.is_empty()
            || !self.order.whatsapp_number.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::Validation(
                "order.whatsapp_number must contain digits only".into(),
            ));
        }
        if self.storage.page_prefix.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "storage.page_prefix must not be empty".into(),
            ));
        }
        if let Some(id) = self
            .site
            .images
            .iter()
            .find(|id| id.is_empty() || id.contains('/'))
        {
            return Err(ConfigError::Validation(format!(
                "site.images entry {id:?} must be a plain name"
            )));
        }
        Ok(())
    }
}

/// Object store layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Folder under which every category has its own sub-folder.
    pub root_prefix: String,
    /// Metadata document name inside each category folder.
    pub metadata_file: String,
    /// File suffixes recognized as gallery images. Matched case-sensitively.
    pub image_extensions: Vec<String>,
    /// Suffix appended to a category's `cover` stem to find its cover image.
    pub cover_extension: String,
    /// Base URL the bucket is publicly served from (used by the local store).
    pub public_base_url: String,
    /// Folder holding the page's own images, one `<id>.webp` per image.
    pub page_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_prefix: "portfolio".to_string(),
            metadata_file: "index.json".to_string(),
            image_extensions: vec![".webp".to_string(), ".png".to_string(), ".jpg".to_string()],
            cover_extension: ".webp".to_string(),
            public_base_url: "/media".to_string(),
            page_prefix: "site".to_string(),
        }
    }
}

/// Carousel behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// A swipe changes slide only when horizontal travel exceeds this.
    pub swipe_threshold_px: u32,
    /// Seconds to wait for a gallery before showing a failure notice.
    pub load_timeout_secs: u64,
}

impl CarouselConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: 50,
            load_timeout_secs: 20,
        }
    }
}

/// Order form settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderConfig {
    /// Destination number in international format, digits only.
    pub whatsapp_number: String,
    /// Shown in the message header.
    pub business_name: String,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: "5511988137150".to_string(),
            business_name: "Lubô Confeitaria".to_string(),
        }
    }
}

/// Page-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub title: String,
    pub language: String,
    /// Ids of page images (logo, hero) resolved from `storage.page_prefix`.
    pub images: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Lubô Confeitaria".to_string(),
            language: "pt-BR".to_string(),
            images: Vec::new(),
        }
    }
}

/// Brand palette used by the carousel and trigger buttons.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorPalette {
    /// Accent: active dot, call-to-action.
    pub terracotta: String,
    /// Title badges on trigger buttons.
    pub cream: String,
    /// Headings and icons.
    pub deep: String,
    /// Modal and button surfaces.
    pub white: String,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            terracotta: "#c0623f".to_string(),
            cream: "#f7efe4".to_string(),
            deep: "#3d2b22".to_string(),
            white: "#fffdf9".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Portfolio Carousel Configuration
# ================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Object store layout
# ---------------------------------------------------------------------------
[storage]
# Folder holding one sub-folder per portfolio category.
root_prefix = "portfolio"

# Metadata document inside each category folder:
#   { "title": "Bolos", "order": 0, "cover": "capa" }
metadata_file = "index.json"

# Files shown in a category's gallery. Matched case-sensitively,
# so "foto.JPG" is ignored unless ".JPG" is listed here.
image_extensions = [".webp", ".png", ".jpg"]

# Appended to the metadata "cover" stem to locate the cover image.
cover_extension = ".webp"

# Base URL the bucket is served from.
public_base_url = "/media"

# Folder holding the page's own images: "<page_prefix>/<id>.webp".
page_prefix = "site"

# ---------------------------------------------------------------------------
# Carousel
# ---------------------------------------------------------------------------
[carousel]
# Horizontal travel (px) a swipe must exceed to change slide.
swipe_threshold_px = 50

# Seconds to wait for a category's images before giving up.
load_timeout_secs = 20

# ---------------------------------------------------------------------------
# Order form
# ---------------------------------------------------------------------------
[order]
# Destination WhatsApp number, international format, digits only.
whatsapp_number = "5511988137150"

# Name shown in the message header.
business_name = "Lubô Confeitaria"

# ---------------------------------------------------------------------------
# Page
# ---------------------------------------------------------------------------
[site]
title = "Lubô Confeitaria"
language = "pt-BR"

# Page images to resolve at start-up, by id (e.g. ["logo", "hero"]).
images = []

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
terracotta = "#c0623f"    # Active dot, call-to-action
cream = "#f7efe4"         # Title badges
deep = "#3d2b22"          # Headings, icons
white = "#fffdf9"         # Modal surface
"##
}

/// Generate CSS custom properties from the palette.
pub fn generate_color_css(colors: &ColorPalette) -> String {
    format!(
        r#":root {{
    --terracotta: {terracotta};
    --cream: {cream};
    --deep: {deep};
    --white: {white};
}}"#,
        terracotta = colors.terracotta,
        cream = colors.cream,
        deep = colors.deep,
        white = colors.white,
    )
}
