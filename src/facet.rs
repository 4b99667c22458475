//! Single-select attribute facets: mood, shape and colour harmony.
//!
//! Each facet holds at most one value. Selecting a value replaces the
//! previous one in the same facet, and selecting the active value again
//! clears it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, Harmony, Mood, ShapeMetrics};

// ============================================================================
// Shape
// ============================================================================

/// Circularity above which a glyph counts as circular.
pub const CIRCULAR_MIN: f64 = 0.85;

/// Circularity below which a glyph counts as angular.
pub const ANGULAR_MAX: f64 = 0.5;

/// Aspect ratio above which a glyph counts as wide.
pub const WIDE_MIN: f64 = 1.5;

/// Aspect ratio below which a glyph counts as tall.
pub const TALL_MAX: f64 = 0.7;

/// Shape bucket derived from circularity and aspect ratio.
///
/// Buckets are neither exhaustive nor disjoint: a glyph with circularity
/// 0.7 and aspect ratio 1.0 is in no bucket, while a wide angular glyph
/// is in two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Shape {
    Circular,
    Angular,
    Wide,
    Tall,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Circular, Shape::Angular, Shape::Wide, Shape::Tall];

    /// Returns false when the descriptor this bucket needs is missing.
    pub fn matches(self, metrics: &ShapeMetrics) -> bool {
        let above = |value: Option<f64>, min: f64| value.is_some_and(|v| v > min);
        let below = |value: Option<f64>, max: f64| value.is_some_and(|v| v < max);
        match self {
            Shape::Circular => above(metrics.circularity, CIRCULAR_MIN),
            Shape::Angular => below(metrics.circularity, ANGULAR_MAX),
            Shape::Wide => above(metrics.aspect_ratio, WIDE_MIN),
            Shape::Tall => below(metrics.aspect_ratio, TALL_MAX),
        }
    }

    /// Lowercase bucket name.
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Circular => "circular",
            Shape::Angular => "angular",
            Shape::Wide => "wide",
            Shape::Tall => "tall",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Facets
// ============================================================================

/// A single facet value, used to toggle one category at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Mood(Mood),
    Shape(Shape),
    Harmony(Harmony),
}

/// The active value of each facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Facets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harmony: Option<Harmony>,
}

impl Facets {
    /// Creates facets with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `facet`, or clears its category if it is already selected.
    pub fn toggle(mut self, facet: Facet) -> Self {
        fn flip<T: PartialEq>(slot: &mut Option<T>, value: T) {
            if slot.as_ref() == Some(&value) {
                *slot = None;
            } else {
                *slot = Some(value);
            }
        }
        match facet {
            Facet::Mood(m) => flip(&mut self.mood, m),
            Facet::Shape(s) => flip(&mut self.shape, s),
            Facet::Harmony(h) => flip(&mut self.harmony, h),
        }
        self
    }

    /// Returns true if `facet` is the active value of its category.
    pub fn is_selected(&self, facet: Facet) -> bool {
        match facet {
            Facet::Mood(m) => self.mood == Some(m),
            Facet::Shape(s) => self.shape == Some(s),
            Facet::Harmony(h) => self.harmony == Some(h),
        }
    }

    /// Returns true if no facet is active.
    pub fn is_empty(&self) -> bool {
        self.mood.is_none() && self.shape.is_none() && self.harmony.is_none()
    }

    /// Deselects every facet.
    pub fn clear(self) -> Self {
        Self::default()
    }

    /// Returns true if `entry` satisfies every active facet.
    ///
    /// An entry without the attribute a facet needs does not match it.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if let Some(mood) = self.mood {
            if entry.mood != Some(mood) {
                return false;
            }
        }
        if let Some(shape) = self.shape {
            match &entry.metrics {
                Some(metrics) if shape.matches(metrics) => {}
                _ => return false,
            }
        }
        if let Some(harmony) = self.harmony {
            if entry.color_harmony != Some(harmony) {
                return false;
            }
        }
        true
    }
}
