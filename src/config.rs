//! Serializable gallery configuration.
//!
//! A [`GalleryConfig`] captures the knobs that differ between gallery
//! deployments, in a JSON-friendly format that a frontend can ship to the
//! engine.
//!
//! # Example
//!
//! ```
//! use glyph_gallery::{GalleryConfig, SearchScope};
//!
//! let config = GalleryConfig::new().with_search_scope(SearchScope::Tags);
//!
//! let json = config.to_json().unwrap();
//! let restored = GalleryConfig::from_json(&json).unwrap();
//! assert_eq!(restored.search_scope, SearchScope::Tags);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;

/// Maximum LAB distance for a glyph to match a picked colour.
pub const COLOR_DISTANCE_THRESHOLD: f64 = 50.0;

// ============================================================================
// SearchScope
// ============================================================================

/// Which entry fields free-text search looks at.
///
/// Matching is always a case-insensitive substring test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SearchScope {
    /// The entry's label (name, falling back to filename, then id).
    Name,
    Id,
    Tags,
    /// Label, id or any tag.
    #[default]
    Any,
}

impl SearchScope {
    /// Returns true if `entry` matches an already-lowercased `needle`.
    pub(crate) fn matches(self, entry: &CatalogEntry, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let hit = |text: &str| text.to_lowercase().contains(needle);
        match self {
            SearchScope::Name => hit(entry.label()),
            SearchScope::Id => hit(&entry.id),
            SearchScope::Tags => entry.tags.iter().any(|t| hit(t)),
            SearchScope::Any => {
                hit(entry.label()) || hit(&entry.id) || entry.tags.iter().any(|t| hit(t))
            }
        }
    }
}

// ============================================================================
// GalleryConfig
// ============================================================================

/// Deployment settings for the filter pipeline.
///
/// # JSON Format
///
/// ```json
/// {
///   "searchScope": "any",
///   "colorThreshold": 50.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GalleryConfig {
    /// Fields searched by the free-text box.
    #[serde(default)]
    pub search_scope: SearchScope,

    /// Colour matches must be strictly closer than this LAB distance.
    #[serde(default = "default_threshold")]
    pub color_threshold: f64,
}

fn default_threshold() -> f64 {
    COLOR_DISTANCE_THRESHOLD
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            search_scope: SearchScope::default(),
            color_threshold: COLOR_DISTANCE_THRESHOLD,
        }
    }
}

impl GalleryConfig {
    /// Creates a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fields searched by free text.
    pub fn with_search_scope(mut self, scope: SearchScope) -> Self {
        self.search_scope = scope;
        self
    }

    /// Sets the maximum LAB distance for colour matches.
    pub fn with_color_threshold(mut self, threshold: f64) -> Self {
        self.color_threshold = threshold;
        self
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_deserializes_to_defaults() {
        let config = GalleryConfig::from_json("{}").unwrap();
        assert_eq!(config, GalleryConfig::default());
        assert_eq!(config.color_threshold, 50.0);
        assert_eq!(config.search_scope, SearchScope::Any);
    }

    #[test]
    fn config_json_format() {
        let json = GalleryConfig::new()
            .with_search_scope(SearchScope::Id)
            .with_color_threshold(30.0)
            .to_json_pretty()
            .unwrap();

        // Verify camelCase serialization
        assert!(json.contains("\"searchScope\": \"id\""));
        assert!(json.contains("\"colorThreshold\": 30.0"));
    }

    #[test]
    fn search_scopes() {
        let entry = CatalogEntry::new("ic-042", ["Weather", "sun"]).with_name("Sunny Day");

        assert!(SearchScope::Name.matches(&entry, "sunny"));
        assert!(!SearchScope::Name.matches(&entry, "042"));
        assert!(SearchScope::Id.matches(&entry, "042"));
        assert!(SearchScope::Tags.matches(&entry, "weather"));
        assert!(!SearchScope::Tags.matches(&entry, "day"));
        assert!(SearchScope::Any.matches(&entry, "day"));
        assert!(SearchScope::Any.matches(&entry, "ic-"));
        assert!(!SearchScope::Any.matches(&entry, "moon"));
        assert!(SearchScope::Id.matches(&entry, ""));
    }
}
