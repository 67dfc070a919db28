//! Grid-to-raster conversion with downsampling and orientation correction.

use overlay_common::{BoundingBox, ColorRamp, Grid};
use rayon::prelude::*;
use tracing::debug;

/// Minimum output pixels before per-row parallel rendering pays off.
const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Options controlling raster output.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Maximum output width in pixels.
    pub max_width: usize,
    /// Maximum output height in pixels.
    pub max_height: usize,
    /// Alpha applied to painted pixels (0.0 to 1.0). Kept below full
    /// opacity so the base map shows through the overlay.
    pub opacity: f64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            max_width: 1024,
            max_height: 1024,
            opacity: 0.82,
        }
    }
}

/// A rendered overlay: RGBA pixel buffer plus geographic bounds.
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    /// RGBA, 4 bytes per pixel, row 0 is geographic north.
    pub pixels: Vec<u8>,
    /// Geographic bounding box locating the raster on the map.
    pub bounds: BoundingBox,
}

impl Raster {
    /// RGBA bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

/// Convert a grid into a map-ready raster.
///
/// A single downsample factor `scale = max(n_lon/max_width,
/// n_lat/max_height, 1)` keeps the output within the target dimensions
/// without ever upsampling; source cells are picked nearest-neighbor with
/// no interpolation. Rows and columns are flipped as needed so that
/// geographic north is the top row and west-to-east runs left-to-right.
///
/// Returns `None` for grids that cannot be located on a map (fewer than 2
/// points on an axis, non-finite corner coordinates) — the caller skips
/// drawing instead of failing the load.
pub fn rasterize(grid: &Grid, ramp: &ColorRamp, options: &RasterOptions) -> Option<Raster> {
    if options.max_width == 0 || options.max_height == 0 {
        return None;
    }
    if grid.is_degenerate() {
        debug!(
            n_lat = grid.n_lat(),
            n_lon = grid.n_lon(),
            "grid is degenerate, skipping rasterization"
        );
        return None;
    }

    let n_lat = grid.n_lat();
    let n_lon = grid.n_lon();

    let scale = (n_lon as f64 / options.max_width as f64)
        .max(n_lat as f64 / options.max_height as f64)
        .max(1.0);
    let width = ((n_lon as f64 / scale).floor() as usize).max(1);
    let height = ((n_lat as f64 / scale).floor() as usize).max(1);

    let lat_ascending = grid.lat_ascending();
    let lon_descending = grid.lon_descending();
    let alpha = (options.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;

    let render_row = |y: usize, row: &mut [u8]| {
        let sample_i = ((y as f64 * scale).floor() as usize).min(n_lat - 1);
        // Row 0 of the output is geographic north.
        let src_i = if lat_ascending {
            n_lat - 1 - sample_i
        } else {
            sample_i
        };

        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let sample_j = ((x as f64 * scale).floor() as usize).min(n_lon - 1);
            let src_j = if lon_descending {
                n_lon - 1 - sample_j
            } else {
                sample_j
            };

            let color = ramp.color_for(Some(grid.value_at(src_i, src_j)));
            if color.is_transparent() {
                px.fill(0);
            } else {
                let color = color.with_alpha(alpha);
                px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
            }
        }
    };

    let mut pixels = vec![0u8; width * height * 4];
    if width * height >= PARALLEL_THRESHOLD {
        pixels
            .par_chunks_mut(width * 4)
            .enumerate()
            .for_each(|(y, row)| render_row(y, row));
    } else {
        for (y, row) in pixels.chunks_mut(width * 4).enumerate() {
            render_row(y, row);
        }
    }

    // Bounds come from the first/last coordinate samples only.
    let bounds = BoundingBox::from_corners(
        grid.lons()[0],
        grid.lats()[0],
        grid.lons()[n_lon - 1],
        grid.lats()[n_lat - 1],
    );

    debug!(width, height, scale, "rasterized grid");
    Some(Raster {
        width,
        height,
        pixels,
        bounds,
    })
}
