//! Raster rendering for gridded emission data.
//!
//! Two presentations of the same grid:
//! - Bitmap overlay: downsampled RGBA raster plus geographic bounds
//! - Cell layer: discrete colored rectangles for vector-shape rendering

pub mod cells;
pub mod png;
pub mod raster;

pub use cells::{cell_layer, Cell};
pub use raster::{rasterize, Raster, RasterOptions};
