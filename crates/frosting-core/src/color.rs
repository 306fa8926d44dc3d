//! Colors and palettes used by animation entities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Palette used by background variants when none (or only invalid colors) is configured.
const DEFAULT_BACKGROUND: [Rgba; 5] = [
    Rgba::rgb(0x66, 0x7e, 0xea),
    Rgba::rgb(0x76, 0x4b, 0xa2),
    Rgba::rgb(0xf0, 0x93, 0xfb),
    Rgba::rgb(0xf5, 0x57, 0x6c),
    Rgba::rgb(0x4f, 0xac, 0xfe),
];

/// Palette used by sparkle and magical effects by default.
const DEFAULT_SPARKLE: [Rgba; 5] = [
    Rgba::rgb(0x93, 0x33, 0xea),
    Rgba::rgb(0x3b, 0x82, 0xf6),
    Rgba::rgb(0xec, 0x48, 0x99),
    Rgba::rgb(0x10, 0xb9, 0x81),
    Rgba::rgb(0xf5, 0x9e, 0x0b),
];

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color `{0}` must start with '#'")]
    MissingHash(String),
    #[error("color `{0}` must have 3, 6 or 8 hex digits")]
    InvalidLength(String),
    #[error("color `{0}` contains a non-hex digit")]
    InvalidDigit(String),
}

/// An 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    /// Same color with the alpha channel replaced.
    ///
    /// Matches appending a two-digit alpha suffix to a `#rrggbb` string,
    /// e.g. `with_alpha(0x40)` is the color at 25% alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Linear interpolation between two colors, channel by channel.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        let t = t.clamp(0.0, 1.0);
        Rgba {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
            a: lerp_u8(self.a, other.a, t),
        }
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }

        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
        let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17);
        let invalid = |_| ColorParseError::InvalidDigit(s.to_string());

        match digits.len() {
            3 => Ok(Rgba::rgb(
                nibble(0).map_err(invalid)?,
                nibble(1).map_err(invalid)?,
                nibble(2).map_err(invalid)?,
            )),
            6 => Ok(Rgba::rgb(
                byte(0).map_err(invalid)?,
                byte(2).map_err(invalid)?,
                byte(4).map_err(invalid)?,
            )),
            8 => Ok(Rgba::new(
                byte(0).map_err(invalid)?,
                byte(2).map_err(invalid)?,
                byte(4).map_err(invalid)?,
                byte(6).map_err(invalid)?,
            )),
            _ => Err(ColorParseError::InvalidLength(s.to_string())),
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// An ordered, never-empty list of colors entities draw from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::background()
    }
}

impl Palette {
    /// Build a palette, falling back to the default background palette when `colors` is empty.
    pub fn new(colors: Vec<Rgba>) -> Self {
        Self::or_fallback(colors, Self::background())
    }

    /// Build a palette, falling back to `fallback` when `colors` is empty.
    pub fn or_fallback(colors: Vec<Rgba>, fallback: Palette) -> Self {
        if colors.is_empty() {
            fallback
        } else {
            Self { colors }
        }
    }

    /// Parse hex strings, skipping malformed entries.
    ///
    /// Returns `fallback` when nothing valid remains.
    pub fn from_hex_lossy<S: AsRef<str>>(colors: &[S], fallback: Palette) -> Self {
        let parsed = colors
            .iter()
            .filter_map(|s| match s.as_ref().parse::<Rgba>() {
                Ok(color) => Some(color),
                Err(err) => {
                    tracing::warn!(%err, "skipping palette color");
                    None
                }
            })
            .collect();
        Self::or_fallback(parsed, fallback)
    }

    /// The default background palette.
    pub fn background() -> Self {
        Self {
            colors: DEFAULT_BACKGROUND.to_vec(),
        }
    }

    /// The default sparkle palette.
    pub fn sparkle() -> Self {
        Self {
            colors: DEFAULT_SPARKLE.to_vec(),
        }
    }

    /// Color for entity `index`, cycling through the palette.
    pub fn color_at(&self, index: usize) -> Rgba {
        match self.colors.len() {
            0 => DEFAULT_BACKGROUND[index % DEFAULT_BACKGROUND.len()],
            len => self.colors[index % len],
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Hex representation, used when writing configuration back to disk.
    pub fn to_hex(&self) -> Vec<String> {
        self.colors.iter().map(ToString::to_string).collect()
    }
}
