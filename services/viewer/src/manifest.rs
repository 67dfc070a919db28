//! Tile manifest loading: the alternative pre-rendered-tile data source.
//!
//! The offline conversion pipeline writes a `tile_manifest.json` next to
//! its PNG tiles — a JSON array of `{filename, url, bbox, crs}` entries
//! with bounding boxes in EPSG:3857 meters. Each entry is reprojected to
//! geographic degrees before it reaches the presenter.

use overlay_common::{mercator, BoundingBox};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct TileManifestEntry {
    filename: String,
    url: String,
    /// `[min_x, min_y, max_x, max_y]` in the manifest's CRS.
    bbox: [f64; 4],
    #[serde(default = "default_crs")]
    crs: String,
}

fn default_crs() -> String {
    "EPSG:3857".to_string()
}

/// A tile ready for a map widget: URL plus geographic bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTile {
    pub filename: String,
    pub url: String,
    pub bounds: BoundingBox,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to parse tile manifest: {0}")]
    Parse(String),

    #[error("Unsupported manifest CRS: {0}")]
    UnsupportedCrs(String),
}

/// Parse a tile manifest and reproject every entry to geographic degrees.
pub fn parse_manifest(json: &str) -> Result<Vec<GeoTile>, ManifestError> {
    let entries: Vec<TileManifestEntry> =
        serde_json::from_str(json).map_err(|e| ManifestError::Parse(e.to_string()))?;

    entries
        .into_iter()
        .map(|entry| {
            let bbox = BoundingBox::new(entry.bbox[0], entry.bbox[1], entry.bbox[2], entry.bbox[3]);
            let bounds = match entry.crs.to_uppercase().as_str() {
                "EPSG:3857" | "EPSG:900913" => mercator::bbox_to_geographic(&bbox),
                "EPSG:4326" | "CRS:84" => bbox,
                other => return Err(ManifestError::UnsupportedCrs(other.to_string())),
            };
            Ok(GeoTile {
                filename: entry.filename,
                url: entry.url,
                bounds,
            })
        })
        .collect()
}
