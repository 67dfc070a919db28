//! JSON grid documents: `{"lat": [...], "lon": [...], "values": [...],
//! "attributes": {...}}` with values row-major by latitude then longitude.

use std::collections::HashMap;

use overlay_common::Grid;
use serde::Deserialize;
use tracing::debug;

use crate::{DecodeError, DecodeResult, GridDecoder};

#[derive(Debug, Deserialize)]
struct GridDocument {
    lat: Vec<f64>,
    lon: Vec<f64>,
    values: Vec<f64>,
    #[serde(default)]
    attributes: HashMap<String, String>,
}

/// Decoder for pre-exported JSON grid documents.
#[derive(Debug, Default, Clone)]
pub struct JsonGridDecoder;

impl GridDecoder for JsonGridDecoder {
    fn decode(&self, bytes: &[u8]) -> DecodeResult<Grid> {
        let doc: GridDocument = serde_json::from_slice(bytes)
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;

        debug!(
            n_lat = doc.lat.len(),
            n_lon = doc.lon.len(),
            "decoded JSON grid document"
        );
        Ok(Grid::new(doc.lat, doc.lon, doc.values, doc.attributes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_document() {
        let json = br#"{
            "lat": [0.0, 10.0],
            "lon": [0.0, 10.0, 20.0],
            "values": [0.0, 0.1, 0.2, 0.3, 0.4, 0.5],
            "attributes": {"substance": "NH3", "year": "2018"}
        }"#;

        let grid = JsonGridDecoder.decode(json).unwrap();
        assert_eq!(grid.n_lat(), 2);
        assert_eq!(grid.n_lon(), 3);
        assert_eq!(grid.value_at(1, 2), 0.5);
        assert_eq!(grid.attributes()["substance"], "NH3");
    }

    #[test]
    fn test_attributes_are_optional() {
        let json = br#"{"lat": [0.0], "lon": [0.0], "values": [1.0]}"#;
        let grid = JsonGridDecoder.decode(json).unwrap();
        assert!(grid.attributes().is_empty());
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            JsonGridDecoder.decode(b"not json"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let json = br#"{"lat": [0.0, 1.0], "lon": [0.0, 1.0], "values": [1.0]}"#;
        assert!(matches!(
            JsonGridDecoder.decode(json),
            Err(DecodeError::Shape(_))
        ));
    }
}
