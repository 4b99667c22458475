//! Export of selected entries as JSON, CSV or a URL list.
//!
//! JSON and CSV exports become [`ExportArtifact`]s for the host to offer as
//! downloads; URL lists and SVG snippets go to a [`Clipboard`].

use std::borrow::Cow;
use std::iter;

use serde::Serialize;

use crate::catalog::{CatalogEntry, Swatch};
use crate::error::{GalleryError, Result};

pub const JSON_FILE_NAME: &str = "glyphs-export.json";
pub const CSV_FILE_NAME: &str = "glyphs-export.csv";

/// CSV column names, in output order.
pub const CSV_COLUMNS: [&str; 29] = [
    "id",
    "filename",
    "glyph_url",
    "dominant_hex",
    "dominant_rgb_r",
    "dominant_rgb_g",
    "dominant_rgb_b",
    "dominant_lab_l",
    "dominant_lab_a",
    "dominant_lab_b",
    "secondary_hex",
    "secondary_rgb_r",
    "secondary_rgb_g",
    "secondary_rgb_b",
    "secondary_lab_l",
    "secondary_lab_a",
    "secondary_lab_b",
    "palette_contrast",
    "edge_density",
    "entropy",
    "texture",
    "contrast",
    "circularity",
    "aspect_ratio",
    "edge_angle",
    "color_harmony",
    "mood",
    "created_date",
    "created_time",
];

/// Cells per swatch: hex, r, g, b, L, a, b.
const SWATCH_CELLS: usize = 7;

/// Cells for the metrics block.
const METRIC_CELLS: usize = 7;

// ============================================================================
// Collaborators
// ============================================================================

/// Write-only text clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str);
}

/// A `String` acts as a clipboard holding the last written text.
impl Clipboard for String {
    fn write_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// Downloadable file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Download file name for this format.
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Json => JSON_FILE_NAME,
            ExportFormat::Csv => CSV_FILE_NAME,
        }
    }

    /// MIME type for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// In-memory file contents ready to be saved by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

// ============================================================================
// Formatters
// ============================================================================

#[derive(Serialize)]
struct ExportDocument<'a> {
    glyphs: &'a [&'a CatalogEntry],
}

/// Pretty-printed `{ "glyphs": [...] }` with every field of each entry.
///
/// The output can be loaded back with [`Catalog::from_json`](crate::Catalog::from_json).
pub fn to_json(entries: &[&CatalogEntry]) -> Result<String> {
    serde_json::to_string_pretty(&ExportDocument { glyphs: entries }).map_err(GalleryError::Export)
}

/// Flat CSV with the [`CSV_COLUMNS`] header and one row per entry.
///
/// Missing values become empty cells. Rows are separated by `\n`.
pub fn to_csv(entries: &[&CatalogEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_COLUMNS.join(","));
    for entry in entries {
        let row = csv_row(entry);
        debug_assert_eq!(row.len(), CSV_COLUMNS.len());
        let cells: Vec<Cow<'_, str>> = row.iter().map(|cell| escape_csv(cell)).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// Newline-separated asset URLs. Entries without a URL are skipped.
pub fn to_url_list(entries: &[&CatalogEntry]) -> String {
    entries
        .iter()
        .filter_map(|e| e.glyph_url.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quotes a CSV cell if it contains a comma or double quote.
///
/// Embedded quotes are doubled: `a,"b"` becomes `"a,""b"""`.
pub fn escape_csv(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn csv_row(entry: &CatalogEntry) -> Vec<String> {
    let mut row = Vec::with_capacity(CSV_COLUMNS.len());
    row.push(entry.id.clone());
    row.push(entry.filename.clone().unwrap_or_default());
    row.push(entry.glyph_url.clone().unwrap_or_default());

    let color = entry.color.as_ref();
    push_swatch(&mut row, color.map(|c| &c.dominant));
    push_swatch(&mut row, color.map(|c| &c.secondary));
    row.push(
        color
            .and_then(|c| c.palette_contrast)
            .map(|v| v.to_string())
            .unwrap_or_default(),
    );

    match entry.metrics {
        Some(m) => row.extend(
            [
                m.edge_density,
                m.entropy,
                m.texture,
                m.contrast,
                m.circularity,
                m.aspect_ratio,
                m.edge_angle,
            ]
            .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
        ),
        None => row.extend(iter::repeat_n(String::new(), METRIC_CELLS)),
    }

    row.push(entry.color_harmony.map(|h| h.to_string()).unwrap_or_default());
    row.push(entry.mood.map(|m| m.to_string()).unwrap_or_default());
    match entry.created_at {
        Some(created) => {
            row.push(created.date.format("%Y-%m-%d").to_string());
            row.push(created.time.format("%H:%M:%S").to_string());
        }
        None => row.extend(iter::repeat_n(String::new(), 2)),
    }
    row
}

fn push_swatch(row: &mut Vec<String>, swatch: Option<&Swatch>) {
    let Some(swatch) = swatch else {
        row.extend(iter::repeat_n(String::new(), SWATCH_CELLS));
        return;
    };
    let lab = swatch.lab();
    row.push(swatch.hex.clone());
    row.extend([swatch.rgb.r, swatch.rgb.g, swatch.rgb.b].map(|c| c.to_string()));
    row.extend([lab.l, lab.a, lab.b].map(|c| c.to_string()));
}

// ============================================================================
// Actions
// ============================================================================

/// Builds a download for `entries`, or `None` if nothing is selected.
pub fn download(entries: &[&CatalogEntry], format: ExportFormat) -> Result<Option<ExportArtifact>> {
    if entries.is_empty() {
        return Ok(None);
    }
    let contents = match format {
        ExportFormat::Json => to_json(entries)?,
        ExportFormat::Csv => to_csv(entries),
    };
    log::debug!("exported {} entries as {}", entries.len(), format.file_name());
    Ok(Some(ExportArtifact {
        file_name: format.file_name(),
        mime_type: format.mime_type(),
        contents,
    }))
}

/// Copies the URL list of `entries`. Returns false if nothing was copied.
pub fn copy_urls<C: Clipboard + ?Sized>(entries: &[&CatalogEntry], clipboard: &mut C) -> bool {
    if entries.is_empty() {
        return false;
    }
    clipboard.write_text(&to_url_list(entries));
    true
}

/// Standalone SVG document for an entry's inline markup.
pub fn svg_snippet(entry: &CatalogEntry) -> Option<String> {
    let svg = entry.svg.as_deref()?;
    Some(match entry.view_box.as_deref() {
        Some(view_box) => format!(
            r#"<svg viewBox="{view_box}" xmlns="http://www.w3.org/2000/svg">{svg}</svg>"#
        ),
        None => format!(r#"<svg xmlns="http://www.w3.org/2000/svg">{svg}</svg>"#),
    })
}

/// Copies an entry's SVG snippet. Returns false if it has no inline SVG.
pub fn copy_svg<C: Clipboard + ?Sized>(entry: &CatalogEntry, clipboard: &mut C) -> bool {
    match svg_snippet(entry) {
        Some(snippet) => {
            clipboard.write_text(&snippet);
            true
        }
        None => false,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CreatedAt, Harmony, Mood, ShapeMetrics};
    use crate::color::Rgb;
    use chrono::{NaiveDate, NaiveTime};

    fn glyph() -> CatalogEntry {
        CatalogEntry::new("g1", ["x"])
            .with_url("https://cdn.example/g1.png")
            .with_colors(Rgb::new(255, 0, 0), Rgb::new(0, 0, 0))
            .with_metrics(ShapeMetrics {
                edge_density: Some(0.05),
                entropy: Some(3.5),
                texture: Some(10.0),
                contrast: Some(0.25),
                circularity: Some(0.9),
                aspect_ratio: Some(1.0),
                edge_angle: Some(45.5),
            })
            .with_mood(Mood::Serene)
            .with_harmony(Harmony::Analogous)
            .with_created_at(CreatedAt::new(
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            ))
    }

    #[test]
    fn csv_escaping() {
        assert_eq!(escape_csv(r#"a,"b""#), r#""a,""b""""#);
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert!(matches!(escape_csv("x"), Cow::Borrowed(_)));
    }

    #[test]
    fn csv_header_and_row() {
        let mut entry = glyph();
        entry.filename = Some("red, black.png".into());
        let csv = to_csv(&[&entry]);
        let lines: Vec<_> = csv.split('\n').collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_COLUMNS.join(","));
        assert!(lines[1].starts_with(
            "g1,\"red, black.png\",https://cdn.example/g1.png,#FF0000,255,0,0,"
        ));
        assert!(lines[1].ends_with(
            ",0.05,3.5,10,0.25,0.9,1,45.5,analogous,serene,2024-06-01,09:05:00"
        ));
    }

    #[test]
    fn csv_blank_cells_for_missing_data() {
        let bare = CatalogEntry::new("bare", ["x"]);
        let csv = to_csv(&[&bare]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, format!("bare{}", ",".repeat(CSV_COLUMNS.len() - 1)));
    }

    #[test]
    fn json_export_reloads_as_catalog() {
        let entry = glyph();
        let json = to_json(&[&entry]).unwrap();
        assert!(json.starts_with("{\n  \"glyphs\": ["));

        let reloaded = Catalog::from_json(&json).unwrap();
        let back = reloaded.get("g1").unwrap();
        assert_eq!(back.glyph_url, entry.glyph_url);
        assert_eq!(back.metrics, entry.metrics);
        assert_eq!(back.mood, entry.mood);
        assert_eq!(back.created_at, entry.created_at);
        assert_eq!(back.color.as_ref().unwrap().dominant.rgb, Rgb::new(255, 0, 0));
    }

    #[test]
    fn url_list_skips_missing() {
        let a = CatalogEntry::new("a", ["x"]).with_url("https://a");
        let b = CatalogEntry::new("b", ["x"]);
        let c = CatalogEntry::new("c", ["x"]).with_url("https://c");
        assert_eq!(to_url_list(&[&a, &b, &c]), "https://a\nhttps://c");

        let mut clipboard = String::new();
        assert!(copy_urls(&[&a, &c], &mut clipboard));
        assert_eq!(clipboard, "https://a\nhttps://c");
        assert!(!copy_urls(&[], &mut clipboard));
    }

    #[test]
    fn download_artifacts() {
        let entry = glyph();
        assert_eq!(download(&[], ExportFormat::Json).unwrap(), None);

        let csv = download(&[&entry], ExportFormat::Csv).unwrap().unwrap();
        assert_eq!(csv.file_name, "glyphs-export.csv");
        assert_eq!(csv.mime_type, "text/csv");

        let json = download(&[&entry], ExportFormat::Json).unwrap().unwrap();
        assert_eq!(json.file_name, "glyphs-export.json");
        assert_eq!(json.mime_type, "application/json");
        assert!(json.contents.contains("\"g1\""));
    }

    #[test]
    fn svg_snippet_reconstruction() {
        let entry = CatalogEntry::new("s", ["x"]).with_svg("0 0 24 24", "<circle r=\"4\"/>");
        let mut clipboard = String::new();
        assert!(copy_svg(&entry, &mut clipboard));
        assert_eq!(
            clipboard,
            r#"<svg viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><circle r="4"/></svg>"#
        );
        assert!(!copy_svg(&glyph(), &mut clipboard));
    }
}
