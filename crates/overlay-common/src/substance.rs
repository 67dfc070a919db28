//! Pollutant substances and their curated classification tables.
//!
//! Emission files carry the substance either in the filename (EDGAR naming,
//! e.g. `v8.1_FT2022_AP_NH3_2018.nc`) or in a `substance` attribute on the
//! value variable; the filename wins when both are present.

use std::collections::HashMap;

use crate::ramp::{
    ColorRamp, ColorStop, PALETTE_BLUE, PALETTE_CYAN, PALETTE_DEEP_BLUE, PALETTE_GREEN,
    PALETTE_ORANGE, PALETTE_RED, PALETTE_YELLOW,
};

/// Pollutants with curated breakpoint tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Substance {
    Pm25,
    Co,
    Nh3,
    So2,
    Nox,
    /// Mercury (EDGAR TOX_Hg product); emissions are orders of magnitude
    /// smaller, so the thresholds are log-like.
    Hg,
}

impl Substance {
    /// Detect the substance from a source filename, falling back to the
    /// decoded variable attributes.
    pub fn detect(filename: &str, attributes: &HashMap<String, String>) -> Option<Self> {
        let upper = filename.to_uppercase();
        if upper.contains("_PM2.5_") || upper.contains("_PM25_") {
            return Some(Substance::Pm25);
        }
        if upper.contains("_CO_") {
            return Some(Substance::Co);
        }
        if upper.contains("_NH3_") {
            return Some(Substance::Nh3);
        }
        if upper.contains("_SO2_") {
            return Some(Substance::So2);
        }
        if upper.contains("_NOX_") {
            return Some(Substance::Nox);
        }
        if upper.contains("_TOX_HG_") || upper.contains("_TOXHG_") {
            return Some(Substance::Hg);
        }

        let attr = attributes
            .get("substance")
            .map(|s| s.to_uppercase())
            .unwrap_or_default();
        match attr.as_str() {
            "CO" => Some(Substance::Co),
            "NH3" => Some(Substance::Nh3),
            "SO2" => Some(Substance::So2),
            "NOX" => Some(Substance::Nox),
            "HG" => Some(Substance::Hg),
            s if s.contains("PM") && s.contains("2.5") => Some(Substance::Pm25),
            _ => None,
        }
    }

    /// Parse a substance name as written in configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().replace('.', "").as_str() {
            "PM25" => Some(Substance::Pm25),
            "CO" => Some(Substance::Co),
            "NH3" => Some(Substance::Nh3),
            "SO2" => Some(Substance::So2),
            "NOX" => Some(Substance::Nox),
            "HG" | "TOX_HG" | "TOXHG" => Some(Substance::Hg),
            _ => None,
        }
    }

    /// Short lowercase label for filenames ("pm25", "nox", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Substance::Pm25 => "pm25",
            Substance::Co => "co",
            Substance::Nh3 => "nh3",
            Substance::So2 => "so2",
            Substance::Nox => "nox",
            Substance::Hg => "hg",
        }
    }

    /// Curated breakpoint table for this substance.
    ///
    /// Each table shares the common emission palette; only the thresholds
    /// differ. Any positive value paints: the lowest band is deep blue,
    /// matching the published EDGAR map styling. Zeros and missing cells
    /// stay transparent through the ramp's classification rules.
    pub fn ramp(&self) -> ColorRamp {
        let thresholds: [f64; 6] = match self {
            Substance::Pm25 => [0.00025, 0.0025, 0.025, 0.50, 5.0, 20.0],
            Substance::Co => [0.00025, 0.0025, 0.025, 0.25, 1.0, 5.0],
            Substance::Nh3 | Substance::So2 | Substance::Nox => {
                [0.00025, 0.0025, 0.025, 0.25, 0.50, 1.2]
            }
            Substance::Hg => [2e-7, 2e-6, 2e-5, 2e-4, 2e-3, 2e-2],
        };
        let colors = [
            PALETTE_DEEP_BLUE,
            PALETTE_BLUE,
            PALETTE_CYAN,
            PALETTE_GREEN,
            PALETTE_YELLOW,
            PALETTE_ORANGE,
        ];

        let stops = thresholds
            .iter()
            .zip(colors)
            .map(|(&threshold, color)| ColorStop { threshold, color })
            .collect();
        ColorRamp::new(stops, PALETTE_RED).expect("curated tables are ascending")
    }
}
