//! Threshold-classified color ramps for emission values.
//!
//! A ramp is an ascending table of `(threshold, color)` stops plus a terminal
//! overflow color. A value takes the color of the first stop whose threshold
//! it is strictly below; anything at or past the last threshold takes the
//! overflow color. Non-finite, missing, and non-positive values never paint.
//!
//! The default ramp puts a transparent color on the lowest stop so that
//! trace emissions below the visibility floor leave the base map untouched;
//! the curated substance tables paint their lowest band instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// Shared 7-color emission palette (deep blue through red).
pub const PALETTE_DEEP_BLUE: Color = Color::opaque(0x03, 0x00, 0x8b);
pub const PALETTE_BLUE: Color = Color::opaque(0x00, 0x39, 0xb3);
pub const PALETTE_CYAN: Color = Color::opaque(0x00, 0x99, 0xcc);
pub const PALETTE_GREEN: Color = Color::opaque(0x34, 0xd1, 0x84);
pub const PALETTE_YELLOW: Color = Color::opaque(0xd4, 0xe8, 0x40);
pub const PALETTE_ORANGE: Color = Color::opaque(0xf7, 0x94, 0x33);
pub const PALETTE_RED: Color = Color::opaque(0xc6, 0x3a, 0x26);

/// A single classification stop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColorStop {
    /// Upper bound (exclusive) of the bucket this color paints.
    pub threshold: f64,
    pub color: Color,
}

/// Ascending-threshold color classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RampDefinition", into = "RampDefinition")]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
    overflow: Color,
}

/// Serialized form of a ramp, validated on construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RampDefinition {
    stops: Vec<ColorStop>,
    overflow: Color,
}

impl TryFrom<RampDefinition> for ColorRamp {
    type Error = RampError;

    fn try_from(def: RampDefinition) -> Result<Self, Self::Error> {
        ColorRamp::new(def.stops, def.overflow)
    }
}

impl From<ColorRamp> for RampDefinition {
    fn from(ramp: ColorRamp) -> Self {
        Self {
            stops: ramp.stops,
            overflow: ramp.overflow,
        }
    }
}

impl ColorRamp {
    /// Build a ramp, validating that thresholds are finite and strictly
    /// ascending.
    pub fn new(stops: Vec<ColorStop>, overflow: Color) -> Result<Self, RampError> {
        if stops.is_empty() {
            return Err(RampError::Empty);
        }
        for (i, stop) in stops.iter().enumerate() {
            if !stop.threshold.is_finite() {
                return Err(RampError::NonFiniteThreshold(stop.threshold));
            }
            if i > 0 && stop.threshold <= stops[i - 1].threshold {
                return Err(RampError::NotAscending {
                    index: i,
                    threshold: stop.threshold,
                });
            }
        }

        Ok(Self { stops, overflow })
    }

    /// Parse a ramp from a JSON definition:
    /// `{"stops":[{"threshold":0.0025,"color":"#03008b"},...],"overflow":"#c63a26"}`.
    pub fn from_json(json: &str) -> Result<Self, RampError> {
        serde_json::from_str(json).map_err(|e| RampError::Parse(e.to_string()))
    }

    /// Default emission ramp used when no substance-specific table applies.
    pub fn emission_default() -> Self {
        // Lowest stop is the visibility floor: trace values stay transparent.
        Self::new(
            vec![
                ColorStop {
                    threshold: 0.00025,
                    color: Color::transparent(),
                },
                ColorStop {
                    threshold: 0.0025,
                    color: PALETTE_DEEP_BLUE,
                },
                ColorStop {
                    threshold: 0.25,
                    color: PALETTE_BLUE,
                },
                ColorStop {
                    threshold: 0.50,
                    color: PALETTE_GREEN,
                },
                ColorStop {
                    threshold: 1.20,
                    color: PALETTE_YELLOW,
                },
            ],
            PALETTE_RED,
        )
        .expect("builtin ramp is valid")
    }

    /// Derive a ramp from the value distribution of a dataset that has no
    /// curated table: bucket boundaries at the 5/25/50/75/90/99th percentiles
    /// of the finite positive values.
    ///
    /// Returns `None` when the dataset has no finite positive values.
    pub fn from_percentiles(values: &[f64]) -> Option<Self> {
        let mut valid: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();
        if valid.is_empty() {
            return None;
        }
        valid.sort_by(|a, b| a.partial_cmp(b).expect("finite values compare"));

        let colors = [
            PALETTE_DEEP_BLUE,
            PALETTE_BLUE,
            PALETTE_CYAN,
            PALETTE_GREEN,
            PALETTE_YELLOW,
            PALETTE_ORANGE,
        ];
        let mut stops = Vec::with_capacity(colors.len());
        let mut prev = f64::NEG_INFINITY;
        for (q, color) in [5.0, 25.0, 50.0, 75.0, 90.0, 99.0].iter().zip(colors) {
            let threshold = percentile(&valid, *q);
            // Skewed distributions can produce tied percentiles; keep the
            // table strictly ascending by dropping the duplicates.
            if threshold > prev {
                stops.push(ColorStop { threshold, color });
                prev = threshold;
            }
        }
        if stops.is_empty() {
            return None;
        }

        Some(Self::new(stops, PALETTE_RED).expect("stops are strictly ascending"))
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn overflow(&self) -> Color {
        self.overflow
    }

    /// Classify a value into a display color.
    ///
    /// Missing, non-finite, zero, and negative values map to transparent.
    /// Pure and deterministic.
    pub fn color_for(&self, value: Option<f64>) -> Color {
        match self.bucket_for(value) {
            Some(i) if i < self.stops.len() => self.stops[i].color,
            Some(_) => self.overflow,
            None => Color::transparent(),
        }
    }

    /// Bucket index for a value: `Some(i)` for the i-th stop, `Some(len)`
    /// for the overflow bucket, `None` for unpaintable values.
    pub fn bucket_for(&self, value: Option<f64>) -> Option<usize> {
        let v = value?;
        if !v.is_finite() || v <= 0.0 {
            return None;
        }
        Some(
            self.stops
                .iter()
                .position(|stop| v < stop.threshold)
                .unwrap_or(self.stops.len()),
        )
    }
}

#[derive(Debug, Error)]
pub enum RampError {
    #[error("Color ramp must have at least one stop")]
    Empty,

    #[error("Non-finite threshold in color ramp: {0}")]
    NonFiniteThreshold(f64),

    #[error("Color ramp thresholds must be strictly ascending (stop {index}: {threshold})")]
    NotAscending { index: usize, threshold: f64 },

    #[error("Failed to parse ramp definition: {0}")]
    Parse(String),
}

/// Linear-interpolated percentile over a sorted slice (numpy convention).
fn percentile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpaintable_values_are_transparent() {
        let ramp = ColorRamp::emission_default();
        for v in [None, Some(f64::NAN), Some(0.0), Some(-3.5)] {
            assert!(ramp.color_for(v).is_transparent(), "{v:?} should not paint");
        }
    }

    #[test]
    fn test_bucket_index_is_monotonic() {
        let ramp = ColorRamp::emission_default();
        let mut prev = 0;
        let mut v = 1e-6;
        while v < 10.0 {
            let bucket = ramp.bucket_for(Some(v)).unwrap();
            assert!(bucket >= prev, "bucket dropped at value {v}");
            prev = bucket;
            v *= 1.3;
        }
        assert_eq!(prev, ramp.stops().len()); // reached the overflow bucket
    }

    #[test]
    fn test_scenario_classification() {
        let ramp = ColorRamp::emission_default();
        let values = [0.001, 0.03, 0.3, 0.6, 1.5, 0.0, 0.0, 0.0, 0.0001];
        let expected = [
            PALETTE_DEEP_BLUE,
            PALETTE_BLUE,
            PALETTE_GREEN,
            PALETTE_YELLOW,
            PALETTE_RED,
            Color::transparent(),
            Color::transparent(),
            Color::transparent(),
            Color::transparent(),
        ];
        for (v, want) in values.iter().zip(expected) {
            assert_eq!(ramp.color_for(Some(*v)), want, "value {v}");
        }
    }

    #[test]
    fn test_rejects_unordered_stops() {
        let stops = vec![
            ColorStop {
                threshold: 1.0,
                color: PALETTE_BLUE,
            },
            ColorStop {
                threshold: 0.5,
                color: PALETTE_GREEN,
            },
        ];
        assert!(matches!(
            ColorRamp::new(stops, PALETTE_RED),
            Err(RampError::NotAscending { index: 1, .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r##"{"stops":[{"threshold":0.1,"color":"transparent"},{"threshold":1.0,"color":"#34d184"}],"overflow":"#c63a26"}"##;
        let ramp = ColorRamp::from_json(json).unwrap();
        assert!(ramp.color_for(Some(0.05)).is_transparent());
        assert_eq!(ramp.color_for(Some(0.5)), PALETTE_GREEN);
        assert_eq!(ramp.color_for(Some(2.0)), PALETTE_RED);
    }

    #[test]
    fn test_percentile_ramp() {
        let values: Vec<f64> = (1..=1000).map(|i| i as f64).collect();
        let ramp = ColorRamp::from_percentiles(&values).unwrap();
        assert_eq!(ramp.color_for(Some(10.0)), PALETTE_DEEP_BLUE);
        assert_eq!(ramp.color_for(Some(5000.0)), PALETTE_RED);
        assert!(ramp.color_for(Some(-1.0)).is_transparent());
    }

    #[test]
    fn test_percentile_ramp_needs_positive_values() {
        assert!(ColorRamp::from_percentiles(&[]).is_none());
        assert!(ColorRamp::from_percentiles(&[0.0, -1.0, f64::NAN]).is_none());
    }

    #[test]
    fn test_percentile_ties_collapse() {
        // Heavily tied distribution still yields a valid ascending table.
        let values = vec![1.0; 100];
        let ramp = ColorRamp::from_percentiles(&values).unwrap();
        assert_eq!(ramp.stops().len(), 1);
        assert_eq!(ramp.color_for(Some(2.0)), PALETTE_RED);
    }
}
