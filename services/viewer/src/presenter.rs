//! Overlay presentation seam.
//!
//! The map widget itself is an external collaborator; the viewer only needs
//! somewhere to push the committed raster. The CLI implements the sink by
//! writing a PNG plus a Leaflet-style bounds sidecar.

use std::path::PathBuf;

use rasterizer::{png, Raster};
use serde::Serialize;
use tracing::{info, warn};

/// Receives overlay state changes for the currently selected year.
pub trait OverlaySink: Send {
    /// Toggle the loading indicator while a load is in flight.
    fn set_loading(&mut self, loading: bool);

    /// Attach a freshly committed overlay, replacing any previous one.
    fn show(&mut self, year: i32, raster: &Raster);

    /// Detach the overlay (load failed or produced nothing visible).
    fn clear(&mut self);
}

#[derive(Debug, Serialize)]
struct BoundsDocument {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

/// Writes committed overlays to disk: `overlay_<year>.png` plus
/// `bounds_<year>.json` with the corner coordinates a map widget needs.
///
/// Write failures do not disturb the view-model state machine; the last
/// failure is kept for the caller to inspect after the load settles.
#[derive(Debug)]
pub struct FilePresenter {
    out_dir: PathBuf,
    last_error: Option<anyhow::Error>,
}

impl FilePresenter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            last_error: None,
        }
    }

    /// The error from the most recent `show`, if it failed.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.last_error.take()
    }

    fn write_overlay(&self, year: i32, raster: &Raster) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.out_dir)?;

        let png_bytes = png::encode_auto(raster.pixels.as_slice(), raster.width, raster.height)?;
        let png_path = self.out_dir.join(format!("overlay_{year}.png"));
        std::fs::write(&png_path, png_bytes)?;

        let (south, west) = raster.bounds.south_west();
        let (north, east) = raster.bounds.north_east();
        let bounds = BoundsDocument {
            south,
            west,
            north,
            east,
        };
        let bounds_path = self.out_dir.join(format!("bounds_{year}.json"));
        std::fs::write(&bounds_path, serde_json::to_vec_pretty(&bounds)?)?;

        info!(year, path = %png_path.display(), "overlay written");
        Ok(())
    }
}

impl OverlaySink for FilePresenter {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            info!("loading...");
        }
    }

    fn show(&mut self, year: i32, raster: &Raster) {
        match self.write_overlay(year, raster) {
            Ok(()) => self.last_error = None,
            Err(e) => {
                warn!(year, error = %e, "failed to write overlay");
                self.last_error = Some(e);
            }
        }
    }

    fn clear(&mut self) {
        info!("overlay cleared");
    }
}
