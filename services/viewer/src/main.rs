//! Emission overlay viewer CLI.
//!
//! Fetches the emission grid for a selected year, rasterizes it, and writes
//! the overlay PNG plus its geographic bounds for a map widget to display.
//! With `--manifest`, loads a pre-rendered tile manifest instead and prints
//! the tiles with their bounds reprojected to geographic coordinates.

mod config;
mod fetch;
mod manifest;
mod presenter;
mod view_model;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::Parser;
use grid_decoder::JsonGridDecoder;
use overlay_common::Substance;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ViewerConfig;
use crate::fetch::YearFetcher;
use crate::manifest::parse_manifest;
use crate::presenter::{FilePresenter, OverlaySink};
use crate::view_model::{LoadPhase, YearLoader};

#[derive(Debug, Parser)]
#[command(name = "viewer", about = "Render emission grids as map overlays")]
struct Args {
    /// Path to the viewer configuration file.
    #[arg(long, default_value = "config/viewer.yaml", env = "VIEWER_CONFIG")]
    config: PathBuf,

    /// Year to load and render.
    #[arg(long)]
    year: Option<i32>,

    /// Load a tile manifest file instead of a year grid.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Override the configured output directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    if let Some(manifest_path) = args.manifest {
        return show_manifest(&manifest_path);
    }

    let year = args
        .year
        .context("--year is required unless --manifest is given")?;
    let config = ViewerConfig::from_file(&args.config)?;

    let substance = match &config.source.substance {
        Some(name) => Some(
            Substance::from_name(name)
                .with_context(|| format!("Unknown substance in config: {name}"))?,
        ),
        None => None,
    };

    let out_dir = args.out_dir.unwrap_or_else(|| config.output.dir.clone());
    let presenter = Arc::new(Mutex::new(FilePresenter::new(out_dir)));
    let sink: Arc<Mutex<dyn OverlaySink>> = presenter.clone();

    let loader = YearLoader::new(
        YearFetcher::new(config.source.url_template.clone())?,
        Arc::new(JsonGridDecoder),
        substance,
        config.raster.to_options(),
        sink,
    );

    loader.select_year(year).await?;

    match loader.phase() {
        LoadPhase::Ready { raster: Some(_), .. } => {
            if let Some(e) = presenter.lock().expect("sink lock").take_error() {
                bail!("failed to write overlay for year {year}: {e:#}");
            }
            info!(year, "overlay ready");
            Ok(())
        }
        LoadPhase::Ready { raster: None, .. } => {
            info!(year, "no visible data for this year");
            Ok(())
        }
        LoadPhase::Failed { message, .. } => bail!("no data for year {year}: {message}"),
        phase => bail!("unexpected final phase: {phase:?}"),
    }
}

fn show_manifest(path: &PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let tiles = parse_manifest(&json)?;

    info!(tiles = tiles.len(), "manifest loaded");
    for tile in &tiles {
        let (south, west) = tile.bounds.south_west();
        let (north, east) = tile.bounds.north_east();
        println!(
            "{}\t{}\t[{south:.6}, {west:.6}] -> [{north:.6}, {east:.6}]",
            tile.filename, tile.url
        );
    }
    Ok(())
}
