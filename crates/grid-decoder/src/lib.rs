//! Decoders turning raw emission-file bytes into a [`Grid`].
//!
//! The decoder is a collaborator seam: the rendering pipeline only sees the
//! [`GridDecoder`] trait. Two implementations ship here:
//!
//! - [`json::JsonGridDecoder`] for the pre-exported JSON grid documents
//!   served next to the map front-end.
//! - `native::NetcdfDecoder` (feature `netcdf`) for raw NetCDF files,
//!   wrapping the external `netcdf` crate.

use overlay_common::{Grid, GridError};
use thiserror::Error;

pub mod json;

#[cfg(feature = "netcdf")]
pub mod native;

pub use json::JsonGridDecoder;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised while decoding a source file into a grid.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed input: {0}")]
    Malformed(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Grid shape error: {0}")]
    Shape(#[from] GridError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses raw bytes into latitude/longitude axes, a flattened value array,
/// and named metadata attributes.
pub trait GridDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> DecodeResult<Grid>;
}
