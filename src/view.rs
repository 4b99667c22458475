//! Render-ready gallery view.
//!
//! [`render`] turns the catalog and the current session state into a flat
//! list of cards plus counters. It holds no state of its own, so hosts call
//! it again after every state change.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::catalog::{Catalog, CatalogEntry};
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::export::{self, Clipboard, ExportArtifact, ExportFormat, svg_snippet};
use crate::favorites::Favorites;
use crate::filter::{FilterState, Match, apply_filters};

// ============================================================================
// Selection
// ============================================================================

/// Entries picked for export.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id`. Returns true if it is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Returns true if `id` is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns the number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected entries in catalog order. Unknown ids are skipped.
    pub fn entries<'a>(&self, catalog: &'a Catalog) -> Vec<&'a CatalogEntry> {
        catalog.iter().filter(|e| self.contains(&e.id)).collect()
    }

    /// Builds a download of the selection, then clears it.
    ///
    /// An empty selection yields `None`. On error the selection is kept.
    pub fn download(
        &mut self,
        catalog: &Catalog,
        format: ExportFormat,
    ) -> Result<Option<ExportArtifact>> {
        let artifact = export::download(&self.entries(catalog), format)?;
        self.clear();
        Ok(artifact)
    }

    /// Copies the selection's URL list, then clears it.
    pub fn copy_urls<C: Clipboard + ?Sized>(
        &mut self,
        catalog: &Catalog,
        clipboard: &mut C,
    ) -> bool {
        let copied = export::copy_urls(&self.entries(catalog), clipboard);
        self.clear();
        copied
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// View types
// ============================================================================

/// What a card displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "src", rename_all = "lowercase")]
pub enum CardImage {
    /// Rendered asset URL.
    Url(String),
    /// Standalone inline SVG document.
    Svg(String),
    None,
}

impl CardImage {
    fn for_entry(entry: &CatalogEntry) -> Self {
        if let Some(url) = &entry.glyph_url {
            CardImage::Url(url.clone())
        } else if let Some(svg) = svg_snippet(entry) {
            CardImage::Svg(svg)
        } else {
            CardImage::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub label: String,
    pub image: CardImage,
    pub favorite: bool,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_distance: Option<f64>,
}

/// Message shown in place of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum Notice {
    /// Nothing matched the current filters.
    Empty,
    /// The catalog could not be loaded; carries the error description.
    LoadFailed(String),
}

impl Notice {
    /// Text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Empty => "No glyphs found",
            Notice::LoadFailed(_) => "Failed to load glyphs",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryView {
    /// Entries in the catalog.
    pub total: usize,
    /// Entries that passed the filters.
    pub showing: usize,
    pub cards: Vec<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl GalleryView {
    /// View shown when the catalog fetch or parse failed.
    pub fn load_failed(err: &GalleryError) -> Self {
        log::error!("catalog load failed: {err}");
        Self {
            total: 0,
            showing: 0,
            cards: Vec::new(),
            notice: Some(Notice::LoadFailed(err.to_string())),
        }
    }
}

// ============================================================================
// Render
// ============================================================================

/// Builds the view for the current state.
pub fn render(
    catalog: &Catalog,
    favorites: &Favorites,
    selection: &Selection,
    state: &FilterState,
    config: &GalleryConfig,
) -> GalleryView {
    let cards: Vec<Card> = apply_filters(catalog, favorites, state, config)
        .into_iter()
        .map(|Match { entry, color_distance }| Card {
            id: entry.id.clone(),
            label: entry.label().to_string(),
            image: CardImage::for_entry(entry),
            favorite: favorites.contains(&entry.id),
            selected: selection.contains(&entry.id),
            color_distance,
        })
        .collect();

    GalleryView {
        total: catalog.len(),
        showing: cards.len(),
        notice: cards.is_empty().then_some(Notice::Empty),
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new("star", ["night", "shape"])
                .with_name("Star")
                .with_svg("0 0 24 24", "<path d=\"M12 2\"/>"),
            CatalogEntry::new("sun", ["day"]).with_url("https://cdn.example/sun.png"),
            CatalogEntry::new("moon", ["night"]),
        ])
    }

    #[test]
    fn renders_cards_with_flags() {
        let catalog = catalog();
        let favorites: Favorites = ["moon"].into_iter().collect();
        let selection: Selection = ["star"].into_iter().collect();
        let state = FilterState::new().toggle_tag("night");

        let view = render(&catalog, &favorites, &selection, &state, &GalleryConfig::default());
        assert_eq!(view.total, 3);
        assert_eq!(view.showing, 2);
        assert_eq!(view.notice, None);

        let star = &view.cards[0];
        assert_eq!(star.label, "Star");
        assert!(star.selected && !star.favorite);
        assert!(matches!(
            &star.image,
            CardImage::Svg(svg) if svg.contains("viewBox=\"0 0 24 24\"")
        ));

        let moon = &view.cards[1];
        assert!(moon.favorite && !moon.selected);
        assert_eq!(moon.image, CardImage::None);
    }

    #[test]
    fn url_preferred_over_svg() {
        let entry = CatalogEntry::new("x", ["t"])
            .with_svg("0 0 1 1", "<g/>")
            .with_url("https://a");
        assert_eq!(CardImage::for_entry(&entry), CardImage::Url("https://a".into()));
    }

    #[test]
    fn empty_result_has_notice() {
        let state = FilterState::new().with_search("comet");
        let view = render(
            &catalog(),
            &Favorites::new(),
            &Selection::new(),
            &state,
            &GalleryConfig::default(),
        );
        assert!(view.cards.is_empty());
        assert_eq!(view.notice, Some(Notice::Empty));
        assert_eq!(view.notice.unwrap().to_string(), "No glyphs found");
    }

    #[test]
    fn color_distance_reaches_cards() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("red", ["x"]).with_colors(Rgb::new(255, 0, 0), Rgb::BLACK),
        ]);
        let state = FilterState::new().with_picked_color(Some(Rgb::new(255, 0, 0)));
        let view = render(
            &catalog,
            &Favorites::new(),
            &Selection::new(),
            &state,
            &GalleryConfig::default(),
        );
        assert_eq!(view.cards[0].color_distance, Some(0.0));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["cards"][0]["colorDistance"], 0.0);
        assert!(json.get("notice").is_none());
    }

    #[test]
    fn load_failure_view() {
        let err = Catalog::from_json("<html>").unwrap_err();
        let view = GalleryView::load_failed(&err);
        assert_eq!(view.showing, 0);
        let notice = view.notice.unwrap();
        assert_eq!(notice.message(), "Failed to load glyphs");
        assert!(matches!(
            notice,
            Notice::LoadFailed(detail) if detail.starts_with("failed to parse catalog")
        ));
    }

    #[test]
    fn load_failure_keeps_field_detail() {
        let json = r#"{"glyphs": [{"id": "a", "mood": "angry"}]}"#;
        let err = Catalog::from_json(json).unwrap_err();
        let view = GalleryView::load_failed(&err);
        assert!(matches!(
            view.notice,
            Some(Notice::LoadFailed(detail)) if detail.contains("angry")
        ));
    }

    #[test]
    fn exporting_clears_selection() {
        let catalog = catalog();
        let mut selection: Selection = ["sun", "moon"].into_iter().collect();

        let artifact = selection.download(&catalog, ExportFormat::Csv).unwrap().unwrap();
        assert_eq!(artifact.contents.lines().count(), 3);
        assert!(selection.is_empty());
        assert_eq!(selection.download(&catalog, ExportFormat::Json).unwrap(), None);

        selection.toggle("sun");
        let mut clipboard = String::new();
        assert!(selection.copy_urls(&catalog, &mut clipboard));
        assert_eq!(clipboard, "https://cdn.example/sun.png");
        assert!(selection.is_empty());
    }

    #[test]
    fn selection_in_catalog_order() {
        let catalog = catalog();
        let mut selection = Selection::new();
        assert!(selection.toggle("moon"));
        assert!(selection.toggle("star"));
        assert!(selection.toggle("ghost"));

        let ids: Vec<_> = selection.entries(&catalog).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["star", "moon"]);

        assert!(!selection.toggle("moon"));
        assert_eq!(selection.len(), 2);
        selection.clear();
        assert!(selection.is_empty());
    }
}
