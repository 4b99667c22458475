//! Error type shared by the catalog loader, exporters and CLI.

use thiserror::Error;

/// Errors surfaced by glyph-gallery operations.
///
/// Only catalog loading is expected to fail in normal use. Malformed
/// favorites and hex input are handled as silent no-ops at the call site.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The catalog document could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Catalog(#[source] serde_json::Error),

    /// A gallery config document could not be parsed.
    #[error("failed to parse config: {0}")]
    Config(#[source] serde_json::Error),

    /// Reading a catalog or favorites source failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A colour string was not a 6-digit hex value.
    #[error("invalid hex colour {0:?}")]
    InvalidHex(String),

    /// Serializing an export document failed.
    #[error("failed to serialize export: {0}")]
    Export(#[source] serde_json::Error),
}

pub type Result<T, E = GalleryError> = std::result::Result<T, E>;
