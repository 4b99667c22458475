//! Catalog data model and JSON loading.
//!
//! A catalog is the static JSON document a gallery loads once at start-up.
//! Two shapes exist in the wild: a plain array of entries (the simple tag
//! galleries) and `{ "glyphs": [...] }` (the analysed glyph library, whose
//! entries also carry colour, metric, mood and timestamp data).

use std::fmt;
use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::color::{Lab, Rgb};
use crate::error::{GalleryError, Result};

// ============================================================================
// Enumerations
// ============================================================================

/// Aesthetic mood assigned to a glyph by the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Mood {
    Serene,
    Calm,
    Playful,
    Energetic,
    Futuristic,
    Mysterious,
    Dramatic,
    Chaotic,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Serene,
        Mood::Calm,
        Mood::Playful,
        Mood::Energetic,
        Mood::Futuristic,
        Mood::Mysterious,
        Mood::Dramatic,
        Mood::Chaotic,
    ];

    /// Lowercase name as stored in catalogs.
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Serene => "serene",
            Mood::Calm => "calm",
            Mood::Playful => "playful",
            Mood::Energetic => "energetic",
            Mood::Futuristic => "futuristic",
            Mood::Mysterious => "mysterious",
            Mood::Dramatic => "dramatic",
            Mood::Chaotic => "chaotic",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hue relationship between a glyph's dominant and secondary colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Harmony {
    /// Hues within 30° of each other.
    Analogous,
    /// Hues roughly opposite (180° ± 30°).
    Complementary,
    /// Neither relationship holds.
    #[serde(rename = "none")]
    #[cfg_attr(feature = "clap", value(name = "none"))]
    Unrelated,
}

impl Harmony {
    /// The harmonies a user can filter by.
    pub const SELECTABLE: [Harmony; 2] = [Harmony::Analogous, Harmony::Complementary];

    /// Name as stored in catalogs; `Unrelated` is `"none"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Harmony::Analogous => "analogous",
            Harmony::Complementary => "complementary",
            Harmony::Unrelated => "none",
        }
    }
}

impl fmt::Display for Harmony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Entry components
// ============================================================================

/// Numeric shape descriptors computed from the glyph's alpha mask.
///
/// Each field is optional; a descriptor absent from the catalog stays
/// `None` rather than reading as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ShapeMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_angle: Option<f64>,
}

impl ShapeMetrics {
    /// Creates metrics with only the two shape-bucket descriptors set.
    pub fn with_shape(circularity: f64, aspect_ratio: f64) -> Self {
        Self {
            circularity: Some(circularity),
            aspect_ratio: Some(aspect_ratio),
            ..Self::default()
        }
    }

    /// Creates metrics with only the edge density set.
    pub fn with_edge_density(edge_density: f64) -> Self {
        Self {
            edge_density: Some(edge_density),
            ..Self::default()
        }
    }
}

/// One colour of a glyph's palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Swatch {
    /// Hex string as stored in the catalog (case and `#` prefix vary).
    pub hex: String,
    /// Named colour family, e.g. `"red"` or `"gold"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub rgb: Rgb,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab: Option<Lab>,
}

impl Swatch {
    /// Creates a swatch with hex and LAB derived from `rgb`.
    pub fn new(rgb: Rgb) -> Self {
        Self {
            hex: rgb.to_hex(),
            group: None,
            rgb,
            lab: Some(rgb.to_lab()),
        }
    }

    /// The stored LAB triple, or one derived from `rgb` when absent.
    pub fn lab(&self) -> Lab {
        self.lab.unwrap_or_else(|| self.rgb.to_lab())
    }
}

/// Dominant and secondary colours of a glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ColorProfile {
    pub dominant: Swatch,
    pub secondary: Swatch,
    /// LAB distance between the two swatches, normalised to 0-1.
    #[serde(default, alias = "palette_distance", skip_serializing_if = "Option::is_none")]
    pub palette_contrast: Option<f64>,
}

/// Creation timestamp, stored as separate date and time strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CreatedAt {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl CreatedAt {
    /// Creates a timestamp from its date and time parts.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Combined date and time, used for newest/oldest ordering.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

// ============================================================================
// CatalogEntry
// ============================================================================

/// A single glyph or icon in the catalog.
///
/// Only `id` is required. The simple galleries provide `name`, `tags`,
/// `svg` and `viewBox`; the analysed library provides everything from
/// `filename` down. Fields not modelled here are kept in `extra` so that
/// exports preserve the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CatalogEntry {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Inner SVG markup (the children of the `<svg>` element).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,

    #[serde(rename = "viewBox", default, skip_serializing_if = "Option::is_none")]
    pub view_box: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Public URL of the rendered asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ShapeMetrics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_harmony: Option<Harmony>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<CreatedAt>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogEntry {
    /// Creates a bare entry with the given id and tags.
    pub fn new<I, S>(id: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: None,
            tags: tags.into_iter().map(Into::into).collect(),
            svg: None,
            view_box: None,
            filename: None,
            glyph_url: None,
            color: None,
            metrics: None,
            color_harmony: None,
            mood: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the inline SVG markup and its `viewBox`.
    pub fn with_svg(mut self, view_box: impl Into<String>, svg: impl Into<String>) -> Self {
        self.view_box = Some(view_box.into());
        self.svg = Some(svg.into());
        self
    }

    /// Sets the rendered asset URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.glyph_url = Some(url.into());
        self
    }

    /// Sets dominant and secondary colours, deriving hex and LAB.
    pub fn with_colors(mut self, dominant: Rgb, secondary: Rgb) -> Self {
        self.color = Some(ColorProfile {
            dominant: Swatch::new(dominant),
            secondary: Swatch::new(secondary),
            palette_contrast: None,
        });
        self
    }

    /// Sets the shape descriptors.
    pub fn with_metrics(mut self, metrics: ShapeMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Sets the mood.
    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    /// Sets the colour harmony.
    pub fn with_harmony(mut self, harmony: Harmony) -> Self {
        self.color_harmony = Some(harmony);
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: CreatedAt) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Human-readable label: name, then filename, then id.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.filename.as_deref())
            .unwrap_or(&self.id)
    }

    /// Returns true if the entry carries `tag` (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// An immutable snapshot of all entries, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Creates a catalog from entries already in memory.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parses a catalog from either a plain array or `{ "glyphs": [...] }`.
    ///
    /// Errors name the offending field or value.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json).map_err(GalleryError::Catalog)?;
        Self::from_value(document)
    }

    /// Parses a catalog from a reader (file, HTTP body, ...).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: Value = serde_json::from_reader(reader).map_err(GalleryError::Catalog)?;
        Self::from_value(document)
    }

    /// Picks the document shape first so that entry errors surface as-is.
    fn from_value(document: Value) -> Result<Self> {
        let entries = match document {
            Value::Array(_) => document,
            Value::Object(mut map) => map.remove("glyphs").ok_or_else(shape_error)?,
            _ => return Err(shape_error()),
        };
        let entries: Vec<CatalogEntry> =
            serde_json::from_value(entries).map_err(GalleryError::Catalog)?;
        log::debug!("loaded catalog with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Returns all entries in source order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Iterates over entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}

fn shape_error() -> GalleryError {
    GalleryError::Catalog(serde::de::Error::custom(
        "expected an array of entries or an object with a \"glyphs\" array",
    ))
}

impl From<Vec<CatalogEntry>> for Catalog {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Self::new(entries)
    }
}

impl IntoIterator for Catalog {
    type Item = CatalogEntry;
    type IntoIter = std::vec::IntoIter<CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
