//! Selected-year view model and load orchestration.
//!
//! One asynchronous fetch → decode → rasterize sequence runs per year
//! selection. Every selection bumps a generation counter; a finished load
//! commits only if its generation is still current, so a slow response for
//! an old year can never overwrite a newer selection.

use std::sync::{Arc, Mutex};

use grid_decoder::{DecodeError, GridDecoder};
use overlay_common::{ColorRamp, Grid, Substance};
use rasterizer::{rasterize, Raster, RasterOptions};
use tracing::{debug, info, warn};

use crate::fetch::{FetchError, YearFetcher};
use crate::presenter::OverlaySink;

/// Why a year's load produced no overlay.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// Display state for the currently selected year.
///
/// Transitions: `Idle → Loading → (Ready | Failed)`, reset to `Loading`
/// whenever a new year is selected.
#[derive(Debug, Clone)]
pub enum LoadPhase {
    Idle,
    Loading {
        year: i32,
    },
    /// Load completed; `raster` is `None` when the grid held no visible
    /// data (valid input, nothing to draw).
    Ready {
        year: i32,
        raster: Option<Arc<Raster>>,
    },
    Failed {
        year: i32,
        message: String,
    },
}

/// View-model state: current phase plus the stale-response guard.
#[derive(Debug)]
pub struct YearView {
    phase: LoadPhase,
    generation: u64,
}

impl Default for YearView {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Idle,
            generation: 0,
        }
    }
}

impl YearView {
    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    /// Start a load for `year`, invalidating any load still in flight.
    /// Returns the generation token the eventual commit must present.
    pub fn begin_load(&mut self, year: i32) -> u64 {
        self.generation += 1;
        self.phase = LoadPhase::Loading { year };
        self.generation
    }

    /// Commit the outcome of a load, unless a newer selection superseded it.
    /// Returns whether the outcome was applied.
    pub fn commit(
        &mut self,
        generation: u64,
        year: i32,
        outcome: Result<Option<Raster>, LoadError>,
        sink: &mut dyn OverlaySink,
    ) -> bool {
        if generation != self.generation {
            debug!(year, generation, current = self.generation, "stale load discarded");
            return false;
        }

        sink.set_loading(false);
        match outcome {
            Ok(Some(raster)) => {
                let raster = Arc::new(raster);
                sink.show(year, &raster);
                self.phase = LoadPhase::Ready {
                    year,
                    raster: Some(raster),
                };
            }
            Ok(None) => {
                info!(year, "no visible data for year");
                sink.clear();
                self.phase = LoadPhase::Ready { year, raster: None };
            }
            Err(e) => {
                warn!(year, error = %e, "year load failed");
                sink.clear();
                self.phase = LoadPhase::Failed {
                    year,
                    message: e.to_string(),
                };
            }
        }
        true
    }
}

/// Drives the full pipeline for year selections.
#[derive(Clone)]
pub struct YearLoader {
    fetcher: YearFetcher,
    decoder: Arc<dyn GridDecoder>,
    substance: Option<Substance>,
    options: RasterOptions,
    view: Arc<Mutex<YearView>>,
    sink: Arc<Mutex<dyn OverlaySink>>,
}

impl YearLoader {
    pub fn new(
        fetcher: YearFetcher,
        decoder: Arc<dyn GridDecoder>,
        substance: Option<Substance>,
        options: RasterOptions,
        sink: Arc<Mutex<dyn OverlaySink>>,
    ) -> Self {
        Self {
            fetcher,
            decoder,
            substance,
            options,
            view: Arc::new(Mutex::new(YearView::default())),
            sink,
        }
    }

    /// Snapshot of the current display phase.
    pub fn phase(&self) -> LoadPhase {
        self.view.lock().expect("view lock").phase().clone()
    }

    /// Select a year: start its load and return the task handle.
    ///
    /// If another load is still in flight its eventual result is discarded
    /// by the generation check in [`YearView::commit`].
    pub fn select_year(&self, year: i32) -> tokio::task::JoinHandle<()> {
        let generation = {
            let mut view = self.view.lock().expect("view lock");
            view.begin_load(year)
        };
        self.sink.lock().expect("sink lock").set_loading(true);
        info!(year, generation, "year selected");

        let loader = self.clone();
        tokio::spawn(async move {
            let outcome = loader.run_pipeline(year).await;
            let mut view = loader.view.lock().expect("view lock");
            let mut sink = loader.sink.lock().expect("sink lock");
            view.commit(generation, year, outcome, &mut *sink);
        })
    }

    /// Fetch, decode, and rasterize one year. Rasterization is bounded CPU
    /// work sized by the output pixel count, safe on the calling task.
    async fn run_pipeline(&self, year: i32) -> Result<Option<Raster>, LoadError> {
        let bytes = self.fetcher.fetch(year).await?;
        let grid = self.decoder.decode(&bytes)?;
        let ramp = self.ramp_for(year, &grid);
        Ok(rasterize(&grid, &ramp, &self.options))
    }

    /// Pick the classification table: configured substance first, then
    /// detection from the source filename and grid attributes, then a
    /// percentile ramp derived from the data itself.
    fn ramp_for(&self, year: i32, grid: &Grid) -> ColorRamp {
        if let Some(substance) = self.substance {
            return substance.ramp();
        }
        if let Some(substance) = Substance::detect(&self.fetcher.url_for(year), grid.attributes())
        {
            debug!(substance = substance.label(), "detected substance");
            return substance.ramp();
        }
        ColorRamp::from_percentiles(grid.values()).unwrap_or_else(ColorRamp::emission_default)
    }
}
