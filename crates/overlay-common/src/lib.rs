//! Common types shared across the emission-overlay crates.

pub mod bbox;
pub mod color;
pub mod grid;
pub mod mercator;
pub mod ramp;
pub mod substance;

pub use bbox::BoundingBox;
pub use color::Color;
pub use grid::{Grid, GridError};
pub use ramp::{ColorRamp, ColorStop, RampError};
pub use substance::Substance;
