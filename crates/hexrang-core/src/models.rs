//! Data models for hexrang
//!
//! Defines the core data structures: HexColor and ColorRecord.
//! A record's hex value doubles as its remote document key, so two records
//! with the same color collapse to one remote document.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from parsing a hex color string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Wrong number of hex digits
    #[error("Expected 6 hex digits, got {0}")]
    InvalidLength(usize),

    /// A character outside 0-9A-Fa-f
    #[error("Invalid hex digit '{0}'")]
    InvalidDigit(char),
}

/// A 6-digit hex color, canonical uppercase with a `#` prefix
///
/// The canonical form is the record's natural unique key: `"#ff8800"`,
/// `"ff8800"`, and `"#FF8800"` all parse to the same value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a color from a hex string, with or without the `#` prefix
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let digits = input.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(ColorParseError::InvalidLength(digits.len()));
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(bad));
        }
        Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
    }

    /// Build a color from RGB components
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(format!("#{:02X}{:02X}{:02X}", r, g, b))
    }

    /// Generate a random color
    ///
    /// Samples in HSB space rather than raw RGB so the results stay in a
    /// pleasant range: full hue circle, saturation 0.40-0.85, brightness
    /// 0.50-0.90.
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    /// Generate a random color using the given RNG (for deterministic tests)
    pub fn random_with(rng: &mut impl Rng) -> Self {
        let hue = rng.gen_range(0.0..360.0);
        let saturation = rng.gen_range(0.40..0.85);
        let brightness = rng.gen_range(0.50..0.90);

        let (r, g, b) = hsb_to_rgb(hue, saturation, brightness);
        Self::from_rgb(r, g, b)
    }

    /// The canonical string form, e.g. `"#FF8800"`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// RGB components of this color
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }

    /// Relative luminance in 0.0-1.0 (Rec. 601 weights)
    ///
    /// Above ~0.6 the color reads as light; callers use this to pick a
    /// contrasting foreground.
    pub fn luminance(&self) -> f64 {
        let (r, g, b) = self.rgb();
        (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

/// Convert hue (degrees), saturation, and brightness (0.0-1.0) to RGB
fn hsb_to_rgb(hue: f64, saturation: f64, brightness: f64) -> (u8, u8, u8) {
    let c = brightness * saturation;
    let sector = hue / 60.0;
    let x = c * (1.0 - (sector % 2.0 - 1.0).abs());

    let (r, g, b) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = brightness - c;
    let to_byte = |v: f64| ((v + m) * 255.0).round() as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

/// A saved color with its sync state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorRecord {
    /// Local row identity (duplicates of the same color are allowed locally)
    pub id: Uuid,
    /// The color value; also the remote document key
    pub hex: HexColor,
    /// When this record was created, set once
    pub created_at: DateTime<Utc>,
    /// True only after a confirmed remote write; never reset
    pub synced: bool,
}

impl ColorRecord {
    /// Create a new unsynced record for the given color
    pub fn new(hex: HexColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            hex,
            created_at: Utc::now(),
            synced: false,
        }
    }

    /// Create a record with a specific ID (for loading from storage)
    pub fn with_id(id: Uuid, hex: HexColor) -> Self {
        Self {
            id,
            hex,
            created_at: Utc::now(),
            synced: false,
        }
    }

    /// Create a new unsynced record with a random color
    pub fn random() -> Self {
        Self::new(HexColor::random())
    }
}
