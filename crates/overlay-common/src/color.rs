//! RGBA color type with hex-string serialization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color value in RGBA format.
///
/// Serializes as a hex string ("#RRGGBB" or "#RRGGBBAA"); the literal
/// "transparent" is also accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse "#RRGGBB" or "#RRGGBBAA" (leading '#' optional).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.trim_start_matches('#');
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ColorParseError::InvalidHex(s.to_string()))
        };

        match hex.len() {
            6 => Ok(Self {
                r: parse(0..2)?,
                g: parse(2..4)?,
                b: parse(4..6)?,
                a: 255,
            }),
            8 => Ok(Self {
                r: parse(0..2)?,
                g: parse(2..4)?,
                b: parse(4..6)?,
                a: parse(6..8)?,
            }),
            _ => Err(ColorParseError::InvalidHex(s.to_string())),
        }
    }

    /// The same color with its alpha channel replaced.
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Color::transparent());
        }
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        if c.is_transparent() {
            "transparent".to_string()
        } else if c.a == 255 {
            format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
        }
    }
}

#[derive(Debug, Error)]
pub enum ColorParseError {
    #[error("Invalid hex color: {0}. Expected '#RRGGBB' or '#RRGGBBAA'")]
    InvalidHex(String),
}
