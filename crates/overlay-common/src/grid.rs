//! Decoded emission grid: coordinate axes plus a flattened scalar field.

use std::collections::HashMap;

use thiserror::Error;

/// A 2-D scalar field with explicit latitude/longitude axes.
///
/// Values are row-major by latitude then longitude: the value for
/// `(lats[i], lons[j])` sits at flattened index `i * lons.len() + j`.
#[derive(Debug, Clone)]
pub struct Grid {
    lats: Vec<f64>,
    lons: Vec<f64>,
    values: Vec<f64>,
    attributes: HashMap<String, String>,
}

impl Grid {
    /// Build a grid, validating that the value array matches the axes.
    pub fn new(
        lats: Vec<f64>,
        lons: Vec<f64>,
        values: Vec<f64>,
        attributes: HashMap<String, String>,
    ) -> Result<Self, GridError> {
        let expected = lats.len() * lons.len();
        if values.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }

        Ok(Self {
            lats,
            lons,
            values,
            attributes,
        })
    }

    pub fn n_lat(&self) -> usize {
        self.lats.len()
    }

    pub fn n_lon(&self) -> usize {
        self.lons.len()
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Value at latitude index `i`, longitude index `j`.
    pub fn value_at(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.lons.len() + j]
    }

    /// Latitude increases with index (index 0 is the southernmost row).
    pub fn lat_ascending(&self) -> bool {
        self.lats.len() >= 2 && self.lats[0] < self.lats[self.lats.len() - 1]
    }

    /// Longitude decreases with index (index 0 is the easternmost column).
    pub fn lon_descending(&self) -> bool {
        self.lons.len() >= 2 && self.lons[0] > self.lons[self.lons.len() - 1]
    }

    /// A grid too small or too malformed to locate on a map.
    ///
    /// Requires at least 2 points on each axis and finite first/last
    /// coordinate samples (those samples define the overlay bounds).
    pub fn is_degenerate(&self) -> bool {
        if self.lats.len() < 2 || self.lons.len() < 2 {
            return true;
        }
        let corners = [
            self.lats[0],
            self.lats[self.lats.len() - 1],
            self.lons[0],
            self.lons[self.lons.len() - 1],
        ];
        corners.iter().any(|c| !c.is_finite())
    }
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("Value array length {actual} does not match grid shape (expected {expected})")]
    ShapeMismatch { expected: usize, actual: usize },
}
