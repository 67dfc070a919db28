//! NetCDF decoding via the external `netcdf` crate (feature `netcdf`).
//!
//! The netcdf library wraps libnetcdf/HDF5, which want a file handle, so
//! decoding from bytes goes through a temp file first.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use overlay_common::Grid;
use tracing::debug;

use crate::{DecodeError, DecodeResult, GridDecoder};

/// Variable attributes worth carrying through to the grid.
const CARRIED_ATTRIBUTES: &[&str] = &["substance", "units", "year", "long_name"];

/// Decoder for EDGAR-style NetCDF emission files: a 2-D `emissions`
/// variable over `lat`/`lon` coordinate axes.
#[derive(Debug, Default, Clone)]
pub struct NetcdfDecoder;

impl GridDecoder for NetcdfDecoder {
    fn decode(&self, bytes: &[u8]) -> DecodeResult<Grid> {
        let temp_file = temp_path();
        let mut file = std::fs::File::create(&temp_file)?;
        file.write_all(bytes)?;
        drop(file);

        let result = decode_file(&temp_file);
        let _ = std::fs::remove_file(&temp_file);
        result
    }
}

fn decode_file(path: &PathBuf) -> DecodeResult<Grid> {
    let nc_file = netcdf::open(path)
        .map_err(|e| DecodeError::Malformed(format!("Failed to open NetCDF: {e}")))?;

    let lats = read_axis(&nc_file, "lat")?;
    let lons = read_axis(&nc_file, "lon")?;

    let var = nc_file
        .variable("emissions")
        .ok_or_else(|| DecodeError::MissingData("emissions variable".to_string()))?;

    let raw: Vec<f64> = var
        .get_values(..)
        .map_err(|e| DecodeError::Malformed(format!("Failed to read emissions: {e}")))?;

    // Fill values become NaN so the rasterizer skips them per-cell.
    let fill_value = get_f64_attr(&var, "_FillValue");
    let values: Vec<f64> = match fill_value {
        Some(fill) => raw
            .into_iter()
            .map(|v| if v == fill { f64::NAN } else { v })
            .collect(),
        None => raw,
    };

    let mut attributes = HashMap::new();
    for name in CARRIED_ATTRIBUTES {
        if let Some(value) = get_str_attr(&var, name) {
            attributes.insert(name.to_string(), value);
        }
    }

    debug!(
        n_lat = lats.len(),
        n_lon = lons.len(),
        ?fill_value,
        "decoded NetCDF grid"
    );
    Ok(Grid::new(lats, lons, values, attributes)?)
}

fn read_axis(file: &netcdf::File, name: &str) -> DecodeResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| DecodeError::MissingData(format!("{name} variable")))?;
    var.get_values(..)
        .map_err(|e| DecodeError::Malformed(format!("Failed to read {name}: {e}")))
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    match var.attribute(name)?.value().ok()? {
        netcdf::AttributeValue::Double(v) => Some(v),
        netcdf::AttributeValue::Float(v) => Some(v as f64),
        netcdf::AttributeValue::Int(v) => Some(v as f64),
        netcdf::AttributeValue::Short(v) => Some(v as f64),
        _ => None,
    }
}

fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    match var.attribute(name)?.value().ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Unique temp path per decode; the counter avoids collisions when several
/// loads overlap.
fn temp_path() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("emission-grid-{}-{n}.nc", std::process::id()))
}
