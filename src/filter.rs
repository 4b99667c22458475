//! Filter state and the filter/sort pipeline.
//!
//! [`FilterState`] is an immutable value: every user action consumes the
//! current state and returns the next one. [`apply_filters`] is a pure
//! function of the catalog, the favorites set, the state and the config.
//!
//! # Example
//!
//! ```
//! use glyph_gallery::{
//!     apply_filters, Catalog, CatalogEntry, Favorites, FilterState, GalleryConfig, TagMode,
//! };
//!
//! let catalog = Catalog::new(vec![
//!     CatalogEntry::new("a", ["x", "y"]),
//!     CatalogEntry::new("b", ["y"]),
//! ]);
//! let state = FilterState::new()
//!     .toggle_tag("x")
//!     .toggle_tag("y")
//!     .with_tag_mode(TagMode::And);
//!
//! let matches = apply_filters(&catalog, &Favorites::new(), &state, &GalleryConfig::default());
//! let ids: Vec<_> = matches.iter().map(|m| m.entry.id.as_str()).collect();
//! assert_eq!(ids, ["a"]);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogEntry};
use crate::color::{Lab, Rgb};
use crate::config::GalleryConfig;
use crate::facet::{Facet, Facets};
use crate::favorites::Favorites;
use crate::tags::{TagMode, TagSet, matches_tags};

// ============================================================================
// SortOrder
// ============================================================================

/// Ordering applied to the filtered entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SortOrder {
    /// Most recently created first.
    #[default]
    Newest,
    Oldest,
    /// Highest edge density first.
    DetailHigh,
    DetailLow,
}

impl SortOrder {
    /// Compares two entries under this order.
    ///
    /// Entries missing the sort key compare after entries that have it.
    pub fn compare(self, a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
        match self {
            SortOrder::Newest => compare_keyed(created(a), created(b), |x, y| y.cmp(x)),
            SortOrder::Oldest => compare_keyed(created(a), created(b), |x, y| x.cmp(y)),
            SortOrder::DetailHigh => {
                compare_keyed(edge_density(a), edge_density(b), |x, y| y.total_cmp(x))
            }
            SortOrder::DetailLow => {
                compare_keyed(edge_density(a), edge_density(b), |x, y| x.total_cmp(y))
            }
        }
    }
}

fn created(entry: &CatalogEntry) -> Option<chrono::NaiveDateTime> {
    entry.created_at.map(|c| c.timestamp())
}

fn edge_density(entry: &CatalogEntry) -> Option<f64> {
    entry.metrics.and_then(|m| m.edge_density)
}

fn compare_keyed<K>(a: Option<K>, b: Option<K>, cmp: impl Fn(&K, &K) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ============================================================================
// FilterState
// ============================================================================

/// The user's current query.
///
/// Created empty and advanced through the consuming `with_*` / `toggle_*`
/// methods, so earlier states can be kept for undo.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FilterState {
    pub active_tags: TagSet,
    pub tag_mode: TagMode,
    pub favorites_only: bool,
    /// Case-insensitive substring; empty matches everything.
    pub search_text: String,
    pub facets: Facets,
    #[serde(with = "hex_option", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<String>"))]
    pub picked_color: Option<Rgb>,
    pub sort: SortOrder,
}

impl FilterState {
    /// Creates the empty state, which excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tag` to the active tags, or removes it if present.
    pub fn toggle_tag(mut self, tag: &str) -> Self {
        self.active_tags.toggle(tag);
        self
    }

    /// Deactivates every tag.
    pub fn clear_tags(mut self) -> Self {
        self.active_tags.clear();
        self
    }

    /// Sets how active tags combine.
    pub fn with_tag_mode(mut self, mode: TagMode) -> Self {
        self.tag_mode = mode;
        self
    }

    /// Switches between AND and OR.
    pub fn toggle_tag_mode(mut self) -> Self {
        self.tag_mode = self.tag_mode.toggled();
        self
    }

    /// Restricts the result to favorites.
    pub fn with_favorites_only(mut self, favorites_only: bool) -> Self {
        self.favorites_only = favorites_only;
        self
    }

    /// Flips the favorites-only restriction.
    pub fn toggle_favorites_only(mut self) -> Self {
        self.favorites_only = !self.favorites_only;
        self
    }

    /// Sets the free-text search.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Selects `facet`, or clears its category if already selected.
    pub fn toggle_facet(mut self, facet: Facet) -> Self {
        self.facets = self.facets.toggle(facet);
        self
    }

    /// Deselects every facet.
    pub fn clear_facets(mut self) -> Self {
        self.facets = self.facets.clear();
        self
    }

    /// Sets or clears the colour filter.
    pub fn with_picked_color(mut self, color: Option<Rgb>) -> Self {
        self.picked_color = color;
        self
    }

    /// Sets the sort order.
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// Serializes `Option<Rgb>` as an optional `#RRGGBB` string.
mod hex_option {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::color::Rgb;

    pub fn serialize<S: Serializer>(
        color: &Option<Rgb>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match color {
            Some(rgb) => serializer.serialize_some(&rgb.to_hex()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Rgb>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(hex) => Rgb::from_hex(&hex)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid hex colour {hex:?}"))),
            None => Ok(None),
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// An entry that passed every filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub entry: &'a CatalogEntry,
    /// LAB distance to the picked colour, when a colour filter is active.
    pub color_distance: Option<f64>,
}

/// Distance from `picked` to the closer of the entry's two colours.
///
/// Returns `None` for entries without colour data.
pub fn color_distance(entry: &CatalogEntry, picked: &Lab) -> Option<f64> {
    let color = entry.color.as_ref()?;
    let dominant = picked.distance(&color.dominant.lab());
    let secondary = picked.distance(&color.secondary.lab());
    Some(dominant.min(secondary))
}

/// Filters and sorts `catalog` according to `state`.
///
/// Stages, each AND-ed with the previous ones:
///
/// 1. favorites only
/// 2. tag match (AND / OR)
/// 3. free-text search over [`GalleryConfig::search_scope`]
/// 4. mood, shape and harmony facets
/// 5. colour distance below [`GalleryConfig::color_threshold`]
///
/// With a colour filter the result is ordered by ascending distance, with
/// `state.sort` breaking ties; otherwise by `state.sort` alone. Sorting is
/// stable, so equal entries keep catalog order.
pub fn apply_filters<'a>(
    catalog: &'a Catalog,
    favorites: &Favorites,
    state: &FilterState,
    config: &GalleryConfig,
) -> Vec<Match<'a>> {
    let needle = state.search_text.to_lowercase();
    let picked = state.picked_color.map(Rgb::to_lab);

    let mut matches: Vec<Match<'a>> = catalog
        .iter()
        .filter(|e| !state.favorites_only || favorites.contains(&e.id))
        .filter(|e| matches_tags(&e.tags, &state.active_tags, state.tag_mode))
        .filter(|e| config.search_scope.matches(e, &needle))
        .filter(|e| state.facets.matches(e))
        .filter_map(|entry| match &picked {
            None => Some(Match {
                entry,
                color_distance: None,
            }),
            Some(lab) => color_distance(entry, lab)
                .filter(|d| *d < config.color_threshold)
                .map(|d| Match {
                    entry,
                    color_distance: Some(d),
                }),
        })
        .collect();

    matches.sort_by(|a, b| {
        compare_keyed(a.color_distance, b.color_distance, |x, y| x.total_cmp(y))
            .then_with(|| state.sort.compare(a.entry, b.entry))
    });

    log::debug!(
        "{} of {} entries match (sort: {:?}, colour: {:?})",
        matches.len(),
        catalog.len(),
        state.sort,
        state.picked_color.map(Rgb::to_hex),
    );
    matches
}

// ============================================================================
// Tests
// ============================================================================
