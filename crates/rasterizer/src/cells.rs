//! Discrete cell rendering: the vector-shape alternative to the bitmap
//! overlay. Every `stride`-th grid point becomes a colored rectangle
//! spanning to the next sampled point.

use overlay_common::{BoundingBox, Color, ColorRamp, Grid};

/// A single colored rectangle, georeferenced by its own bounds.
#[derive(Debug, Clone)]
pub struct Cell {
    pub bounds: BoundingBox,
    pub value: f64,
    pub color: Color,
}

/// Sample a grid at a fixed stride into discrete cells.
///
/// Transparent classifications and cells with non-finite corner
/// coordinates are omitted; a degenerate grid yields no cells.
pub fn cell_layer(grid: &Grid, ramp: &ColorRamp, stride: usize) -> Vec<Cell> {
    if grid.is_degenerate() {
        return Vec::new();
    }
    let stride = stride.max(1);

    let n_lat = grid.n_lat();
    let n_lon = grid.n_lon();
    let mut cells = Vec::new();

    for i in (0..n_lat).step_by(stride) {
        let i2 = (i + stride).min(n_lat - 1);
        if i2 == i {
            continue; // zero-height cell at the grid edge
        }
        for j in (0..n_lon).step_by(stride) {
            let j2 = (j + stride).min(n_lon - 1);
            if j2 == j {
                continue;
            }

            let value = grid.value_at(i, j);
            let color = ramp.color_for(Some(value));
            if color.is_transparent() {
                continue;
            }

            let corners = [grid.lats()[i], grid.lats()[i2], grid.lons()[j], grid.lons()[j2]];
            if corners.iter().any(|c| !c.is_finite()) {
                continue;
            }

            cells.push(Cell {
                bounds: BoundingBox::from_corners(
                    grid.lons()[j],
                    grid.lats()[i],
                    grid.lons()[j2],
                    grid.lats()[i2],
                ),
                value,
                color,
            });
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn test_grid() -> Grid {
        // 3x3, only the center value paints with the default ramp.
        Grid::new(
            vec![0.0, 10.0, 20.0],
            vec![0.0, 10.0, 20.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0],
            HashMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_transparent_cells_are_omitted() {
        let cells = cell_layer(&test_grid(), &ColorRamp::emission_default(), 1);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].value, 0.5);
        assert_eq!(
            cells[0].bounds,
            BoundingBox::new(10.0, 10.0, 20.0, 20.0)
        );
    }

    #[test]
    fn test_stride_skips_points() {
        let lats: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let lons = lats.clone();
        let values = vec![1.0; 100];
        let grid = Grid::new(lats, lons, values, HashMap::new()).unwrap();

        let all = cell_layer(&grid, &ColorRamp::emission_default(), 1);
        let sampled = cell_layer(&grid, &ColorRamp::emission_default(), 3);
        assert_eq!(all.len(), 81);
        assert_eq!(sampled.len(), 9);
    }

    #[test]
    fn test_degenerate_grid_yields_nothing() {
        let grid = Grid::new(vec![0.0], vec![0.0], vec![1.0], HashMap::new()).unwrap();
        assert!(cell_layer(&grid, &ColorRamp::emission_default(), 1).is_empty());
    }
}
