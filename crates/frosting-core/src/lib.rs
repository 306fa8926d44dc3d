//! Core types shared across the frosting crates.
//!
//! Holds the option enums that make up the configuration surface of every
//! animation variant, plus the color and palette types entities draw from.

mod color;
mod options;

pub use color::{ColorParseError, Palette, Rgba};
pub use options::{
    AnimationSpeed, BackgroundVariant, Direction, FloatingPreset, Intensity, MagicalVariant,
    ParseOptionError, SparklePreset, SparkleSize, Trigger,
};
