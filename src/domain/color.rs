//! City-hall theme colours.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#?([a-f\d]{2})([a-f\d]{2})([a-f\d]{2})$").expect("static pattern is valid")
});

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Lower-case `#rrggbb` notation.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceived brightness in `0.0..=1.0`.
    #[must_use]
    pub fn luminance(self) -> f64 {
        0.114f64.mul_add(
            f64::from(self.b),
            0.299f64.mul_add(f64::from(self.r), 0.587 * f64::from(self.g)),
        ) / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Parses `#RRGGBB` or `RRGGBB`, case-insensitively.
#[must_use]
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let captures = HEX_COLOR.captures(hex)?;
    let channel = |i: usize| u8::from_str_radix(&captures[i], 16).ok();
    Some(Rgb {
        r: channel(1)?,
        g: channel(2)?,
        b: channel(3)?,
    })
}

/// Which text colour reads best on a background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    /// Use light text (dark background).
    Light,
    /// Use dark text (light background).
    Dark,
}

/// Picks the text contrast for a background colour.
///
/// Unparseable colours fall back to [`Contrast::Dark`].
#[must_use]
pub fn contrast(hex: &str) -> Contrast {
    match hex_to_rgb(hex) {
        Some(rgb) if rgb.luminance() > 0.5 => Contrast::Dark,
        Some(_) => Contrast::Light,
        None => Contrast::Dark,
    }
}
