//! Tests for grid-to-raster conversion: downsampling, orientation
//! correction, color classification, and degenerate-input handling.

use std::collections::HashMap;

use overlay_common::{Color, ColorRamp, Grid};
use rasterizer::{rasterize, RasterOptions};

fn grid(lats: Vec<f64>, lons: Vec<f64>, values: Vec<f64>) -> Grid {
    Grid::new(lats, lons, values, HashMap::new()).unwrap()
}

fn opaque_options(max_width: usize, max_height: usize) -> RasterOptions {
    RasterOptions {
        max_width,
        max_height,
        opacity: 1.0,
    }
}

fn rgb(px: [u8; 4]) -> (u8, u8, u8) {
    (px[0], px[1], px[2])
}

#[test]
fn test_scenario_grid_classification() {
    // lat ascending, so the raster's top row is the lat=20 source row.
    let g = grid(
        vec![0.0, 10.0, 20.0],
        vec![0.0, 10.0, 20.0],
        vec![0.001, 0.03, 0.3, 0.6, 1.5, 0.0, 0.0, 0.0, 0.0001],
    );
    let ramp = ColorRamp::emission_default();
    let raster = rasterize(&g, &ramp, &opaque_options(3, 3)).unwrap();
    assert_eq!((raster.width, raster.height), (3, 3));

    let color_of = |v: f64| ramp.color_for(Some(v));

    // Top row: lat 20 -> all transparent.
    for x in 0..3 {
        assert_eq!(raster.pixel(x, 0)[3], 0);
    }
    // Middle row: lat 10 -> yellow-green, hotspot red, transparent.
    assert_eq!(rgb(raster.pixel(0, 1)), rgb_of(color_of(0.6)));
    assert_eq!(rgb(raster.pixel(1, 1)), rgb_of(color_of(1.5)));
    assert_eq!(raster.pixel(2, 1)[3], 0);
    // Bottom row: lat 0 -> deep blue, blue, green.
    assert_eq!(rgb(raster.pixel(0, 2)), rgb_of(color_of(0.001)));
    assert_eq!(rgb(raster.pixel(1, 2)), rgb_of(color_of(0.03)));
    assert_eq!(rgb(raster.pixel(2, 2)), rgb_of(color_of(0.3)));
}

fn rgb_of(c: Color) -> (u8, u8, u8) {
    (c.r, c.g, c.b)
}

#[test]
fn test_scale_one_reproduces_source_assignment() {
    let lats: Vec<f64> = (0..8).map(|i| 50.0 - i as f64).collect(); // descending
    let lons: Vec<f64> = (0..12).map(|j| j as f64).collect();
    let values: Vec<f64> = (0..96).map(|i| i as f64 * 0.02).collect();
    let g = grid(lats, lons, values);
    let ramp = ColorRamp::emission_default();

    let raster = rasterize(&g, &ramp, &opaque_options(12, 8)).unwrap();
    assert_eq!((raster.width, raster.height), (12, 8));

    for y in 0..8 {
        for x in 0..12 {
            let expected = ramp.color_for(Some(g.value_at(y, x)));
            let px = raster.pixel(x, y);
            if expected.is_transparent() {
                assert_eq!(px[3], 0, "pixel ({x},{y})");
            } else {
                assert_eq!(rgb(px), rgb_of(expected), "pixel ({x},{y})");
            }
        }
    }
}

#[test]
fn test_ascending_latitude_flips_rows() {
    // Only the northernmost row paints; with ascending latitudes that row
    // is the last source row and must land on raster row 0.
    let g = grid(
        vec![0.0, 10.0, 20.0],
        vec![0.0, 10.0],
        vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0],
    );
    let raster = rasterize(&g, &ColorRamp::emission_default(), &opaque_options(2, 3)).unwrap();

    assert!(raster.pixel(0, 0)[3] > 0, "north row should paint");
    assert_eq!(raster.pixel(0, 1)[3], 0);
    assert_eq!(raster.pixel(0, 2)[3], 0);
}

#[test]
fn test_descending_longitude_flips_columns() {
    // Longitudes run east-to-west in the source; the westernmost column
    // (last index) paints and must land on raster column 0.
    let g = grid(
        vec![10.0, 0.0],
        vec![20.0, 10.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
    );
    let raster = rasterize(&g, &ColorRamp::emission_default(), &opaque_options(3, 2)).unwrap();

    assert!(raster.pixel(0, 0)[3] > 0, "west column should paint");
    assert_eq!(raster.pixel(1, 0)[3], 0);
    assert_eq!(raster.pixel(2, 0)[3], 0);
}

#[test]
fn test_downsample_respects_target_dimensions() {
    let lats: Vec<f64> = (0..50).map(|i| i as f64).collect();
    let lons: Vec<f64> = (0..100).map(|j| j as f64).collect();
    let g = grid(lats, lons, vec![1.0; 5000]);

    let raster = rasterize(&g, &ColorRamp::emission_default(), &opaque_options(30, 20)).unwrap();
    assert!(raster.width <= 30, "width {} exceeds target", raster.width);
    assert!(raster.height <= 20, "height {} exceeds target", raster.height);
}

#[test]
fn test_small_grids_are_never_upsampled() {
    let g = grid(
        vec![10.0, 0.0],
        vec![0.0, 1.0, 2.0, 3.0],
        vec![1.0; 8],
    );
    let raster =
        rasterize(&g, &ColorRamp::emission_default(), &opaque_options(100, 100)).unwrap();
    assert_eq!((raster.width, raster.height), (4, 2));
}

#[test]
fn test_bounds_from_corner_samples() {
    let g = grid(
        vec![-30.0, 0.0, 45.0],
        vec![170.0, 175.0, -180.0, -175.0],
        vec![1.0; 12],
    );
    let raster = rasterize(&g, &ColorRamp::emission_default(), &opaque_options(4, 3)).unwrap();

    assert_eq!(raster.bounds.min_y, -30.0);
    assert_eq!(raster.bounds.max_y, 45.0);
    assert_eq!(raster.bounds.min_x, -175.0);
    assert_eq!(raster.bounds.max_x, 170.0);
}

#[test]
fn test_degenerate_grids_yield_no_raster() {
    let ramp = ColorRamp::emission_default();
    let opts = RasterOptions::default();

    assert!(rasterize(&grid(vec![], vec![], vec![]), &ramp, &opts).is_none());
    assert!(rasterize(&grid(vec![0.0], vec![0.0, 1.0], vec![0.0; 2]), &ramp, &opts).is_none());
    assert!(rasterize(
        &grid(vec![f64::NAN, 1.0], vec![0.0, 1.0], vec![0.0; 4]),
        &ramp,
        &opts
    )
    .is_none());
}

#[test]
fn test_nan_cells_are_skipped_not_fatal() {
    let g = grid(
        vec![10.0, 0.0],
        vec![0.0, 10.0],
        vec![f64::NAN, 1.0, f64::INFINITY, 0.5],
    );
    let raster = rasterize(&g, &ColorRamp::emission_default(), &opaque_options(2, 2)).unwrap();

    assert_eq!(raster.pixel(0, 0)[3], 0);
    assert!(raster.pixel(1, 0)[3] > 0);
    assert_eq!(raster.pixel(0, 1)[3], 0);
    assert!(raster.pixel(1, 1)[3] > 0);
}

#[test]
fn test_painted_pixels_use_overlay_alpha() {
    let g = grid(vec![10.0, 0.0], vec![0.0, 10.0], vec![1.0; 4]);
    let raster = rasterize(&g, &ColorRamp::emission_default(), &RasterOptions::default()).unwrap();

    let alpha = raster.pixel(0, 0)[3];
    assert_eq!(alpha, (0.82f64 * 255.0).round() as u8);
}

#[test]
fn test_large_grid_uses_parallel_path() {
    // 512x512 output crosses the parallel threshold; result must match the
    // same classification as the sequential path.
    let lats: Vec<f64> = (0..512).map(|i| 60.0 - i as f64 * 0.1).collect();
    let lons: Vec<f64> = (0..512).map(|j| j as f64 * 0.1).collect();
    let values: Vec<f64> = (0..512 * 512).map(|i| (i % 7) as f64 * 0.3).collect();
    let g = grid(lats, lons, values);
    let ramp = ColorRamp::emission_default();

    let raster = rasterize(&g, &ramp, &opaque_options(512, 512)).unwrap();
    assert_eq!((raster.width, raster.height), (512, 512));
    let expected = ramp.color_for(Some(g.value_at(3, 5)));
    assert_eq!(rgb(raster.pixel(5, 3)), rgb_of(expected));
}
