//! Multi-select tag filtering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// How multiple active tags combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum TagMode {
    /// At least one active tag must be present.
    #[default]
    Or,
    /// Every active tag must be present.
    And,
}

impl TagMode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            TagMode::Or => TagMode::And,
            TagMode::And => TagMode::Or,
        }
    }
}

/// The set of tags the user has selected, in selection order.
///
/// Tags are compared exactly: `"Star"` and `"star"` are different tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tag` if absent, removes it if present.
    ///
    /// Returns true if the tag is active afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if let Some(index) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(index);
            false
        } else {
            self.tags.push(tag.to_string());
            true
        }
    }

    /// Returns true if `tag` is active.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns the number of active tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if no tag is active.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Deactivates every tag.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Iterates over active tags in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            let tag = tag.into();
            if !set.contains(&tag) {
                set.tags.push(tag);
            }
        }
        set
    }
}

/// Returns true if an entry with `entry_tags` passes the active tag filter.
///
/// An empty active set never excludes anything.
pub fn matches_tags<S: AsRef<str>>(entry_tags: &[S], active: &TagSet, mode: TagMode) -> bool {
    if active.is_empty() {
        return true;
    }
    let has = |tag: &str| entry_tags.iter().any(|t| t.as_ref() == tag);
    match mode {
        TagMode::And => active.iter().all(has),
        TagMode::Or => active.iter().any(has),
    }
}

// ============================================================================
// TagIndex
// ============================================================================

/// A tag and the number of catalog entries carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Every tag in a catalog with its usage count, sorted by tag name.
///
/// Counts are taken over the full catalog, not the filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagIndex {
    tags: Vec<TagCount>,
}

impl TagIndex {
    /// Counts every tag across `catalog`.
    pub fn build(catalog: &Catalog) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in catalog {
            for tag in &entry.tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
        let tags = counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect();
        Self { tags }
    }

    /// All tags with counts, sorted by name.
    pub fn tags(&self) -> &[TagCount] {
        &self.tags
    }

    /// Number of entries carrying `tag`, or 0 if unknown.
    pub fn count(&self, tag: &str) -> usize {
        self.tags
            .binary_search_by(|t| t.tag.as_str().cmp(tag))
            .map(|i| self.tags[i].count)
            .unwrap_or(0)
    }

    /// Tags whose name contains `query`, ignoring case.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a TagCount> + 'a {
        let query = query.to_lowercase();
        self.tags
            .iter()
            .filter(move |t| t.tag.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn set(tags: &[&str]) -> TagSet {
        tags.iter().copied().collect()
    }

    #[test]
    fn empty_active_set_matches_everything() {
        let none: [&str; 0] = [];
        for mode in [TagMode::Or, TagMode::And] {
            assert!(matches_tags(&["x"], &TagSet::new(), mode));
            assert!(matches_tags(&none, &TagSet::new(), mode));
        }
    }

    #[test]
    fn and_requires_all_or_requires_any() {
        let active = set(&["x", "y"]);
        assert!(matches_tags(&["x", "y", "z"], &active, TagMode::And));
        assert!(!matches_tags(&["y"], &active, TagMode::And));
        assert!(matches_tags(&["y"], &active, TagMode::Or));
        assert!(!matches_tags(&["z"], &active, TagMode::Or));
    }

    #[test]
    fn and_implies_or() {
        let samples: [&[&str]; 4] = [&["x"], &["x", "y"], &["q"], &[]];
        let actives = [set(&["x"]), set(&["x", "y"]), set(&["q", "x"])];
        for tags in samples {
            for active in &actives {
                if matches_tags(tags, active, TagMode::And) {
                    assert!(matches_tags(tags, active, TagMode::Or));
                }
            }
        }
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert!(!matches_tags(&["Star"], &set(&["star"]), TagMode::Or));
    }

    #[test]
    fn toggle_twice_restores_set() {
        let original = set(&["a", "b"]);
        let mut tags = original.clone();
        assert!(tags.toggle("c"));
        assert!(!tags.toggle("c"));
        assert_eq!(tags, original);

        assert!(!tags.toggle("a"));
        assert!(tags.toggle("a"));
        assert!(tags.contains("a"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn from_iter_dedupes_and_keeps_order() {
        let tags = set(&["b", "a", "b"]);
        assert_eq!(tags.iter().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn mode_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&TagMode::And).unwrap(), "\"AND\"");
        assert_eq!(TagMode::Or.toggled(), TagMode::And);
    }

    #[test]
    fn tag_index_counts_and_searches() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("a", ["Night", "sky"]),
            CatalogEntry::new("b", ["sky"]),
            CatalogEntry::new("c", Vec::<String>::new()),
        ]);
        let index = TagIndex::build(&catalog);

        let names: Vec<_> = index.tags().iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(names, ["Night", "sky"]);
        assert_eq!(index.count("sky"), 2);
        assert_eq!(index.count("missing"), 0);

        let found: Vec<_> = index.search("NIG").map(|t| t.tag.as_str()).collect();
        assert_eq!(found, ["Night"]);
        assert_eq!(index.search("").count(), 2);
    }
}
