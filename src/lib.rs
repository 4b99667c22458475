//! glyph-gallery: filter, sort and export engine for vector glyph catalogs
//!
//! This crate loads a static JSON catalog of glyphs or icons and answers the
//! questions a gallery UI asks of it: which entries match the current tags,
//! search text, facets and picked colour, in what order, and what the user's
//! selection looks like as JSON, CSV or a URL list.
//!
//! # Example
//!
//! ```
//! use glyph_gallery::{
//!     Catalog, Favorites, FilterState, GalleryConfig, Rgb, Selection, render,
//! };
//!
//! let catalog = Catalog::from_json(r#"{"glyphs": [
//!     {"id": "ember", "tags": ["fire"], "color": {
//!         "dominant": {"hex": "fe0101", "rgb": [254, 1, 1]},
//!         "secondary": {"hex": "000000", "rgb": [0, 0, 0]}}},
//!     {"id": "leaf", "tags": ["nature"], "color": {
//!         "dominant": {"hex": "00ff00", "rgb": [0, 255, 0]},
//!         "secondary": {"hex": "00ff00", "rgb": [0, 255, 0]}}}
//! ]}"#).unwrap();
//!
//! let state = FilterState::new().with_picked_color(Rgb::from_hex("#FF0000"));
//! let view = render(
//!     &catalog,
//!     &Favorites::new(),
//!     &Selection::new(),
//!     &state,
//!     &GalleryConfig::default(),
//! );
//!
//! assert_eq!(view.showing, 1);
//! assert_eq!(view.cards[0].id, "ember");
//! ```
//!
//! # Session state
//!
//! [`FilterState`] is advanced by consuming builder methods. Favorites
//! persist through a [`KeyValueStore`] and exports go through
//! [`download`] or a [`Clipboard`]:
//!
//! ```
//! use glyph_gallery::{
//!     Catalog, CatalogEntry, ExportFormat, Favorites, MemoryStore, Selection, download,
//! };
//!
//! let catalog = Catalog::new(vec![CatalogEntry::new("star", ["night"])]);
//!
//! let mut store = MemoryStore::new();
//! let mut favorites = Favorites::load(&store);
//! favorites.toggle(&mut store, "star");
//!
//! let mut selection = Selection::new();
//! selection.toggle("star");
//! let artifact = download(&selection.entries(&catalog), ExportFormat::Csv)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(artifact.file_name, "glyphs-export.csv");
//! ```

mod catalog;
mod color;
mod config;
mod error;
mod export;
mod facet;
mod favorites;
mod filter;
mod picker;
mod tags;
mod view;

pub use catalog::{
    Catalog, CatalogEntry, ColorProfile, CreatedAt, Harmony, Mood, ShapeMetrics, Swatch,
};
pub use color::{Hsl, Lab, Rgb, hsl_to_rgb, lab_distance, rgb_to_hsl, rgb_to_lab};
pub use config::{COLOR_DISTANCE_THRESHOLD, GalleryConfig, SearchScope};
pub use error::{GalleryError, Result};
pub use export::{
    CSV_COLUMNS, Clipboard, ExportArtifact, ExportFormat, copy_svg, copy_urls, download,
    escape_csv, svg_snippet, to_csv, to_json, to_url_list,
};
pub use facet::{Facet, Facets, Shape};
pub use favorites::{FAVORITES_KEY, Favorites, KeyValueStore, MemoryStore};
pub use filter::{FilterState, Match, SortOrder, apply_filters, color_distance};
pub use picker::{ColorPicker, ColorSample, Cursor, DragTarget, gradient_color};
pub use tags::{TagCount, TagIndex, TagMode, TagSet, matches_tags};
pub use view::{Card, CardImage, GalleryView, Notice, Selection, render};
