//! Option enums recognized by the animation configuration surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when an option name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: String,
}

/// Implements `name`, `ALL`, `next`, `Display` and `FromStr` for a
/// fieldless option enum from its lowercase names.
macro_rules! named_options {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every value, in cycling order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Lowercase name as used in config files and on the command line.
            pub fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }

            /// Cycle to the next value.
            pub fn next(self) -> Self {
                let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
                Self::ALL[(idx + 1) % Self::ALL.len()]
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = ParseOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == lower)
                    .ok_or_else(|| ParseOptionError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|v| v.name())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

/// Animation speed class. Scales every kinematic magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

named_options!(AnimationSpeed, "speed", {
    Slow => "slow",
    Medium => "medium",
    Fast => "fast",
});

impl AnimationSpeed {
    /// Multiplier applied to velocities, drifts and rotation speeds.
    pub fn multiplier(self) -> f64 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 2.0,
        }
    }
}

/// Which background simulation runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundVariant {
    None,
    #[default]
    Waves,
    Bubbles,
    Geometric,
    Organic,
}

named_options!(BackgroundVariant, "background variant", {
    None => "none",
    Waves => "waves",
    Bubbles => "bubbles",
    Geometric => "geometric",
    Organic => "organic",
});

/// Activation policy of the sparkle population manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Active from mount.
    Always,
    /// Active only while the pointer is over the container.
    #[default]
    Hover,
    /// Each click spawns a burst at the pointer.
    Click,
}

named_options!(Trigger, "trigger", {
    Always => "always",
    Hover => "hover",
    Click => "click",
});

/// General travel direction of floating elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
    Random,
}

named_options!(Direction, "direction", {
    Up => "up",
    Down => "down",
    Random => "random",
});

/// Size class of sparkle glyphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SparkleSize {
    Small,
    #[default]
    Medium,
    Large,
}

named_options!(SparkleSize, "sparkle size", {
    Small => "small",
    Medium => "medium",
    Large => "large",
});

impl SparkleSize {
    /// Glyph size range in pixels as `(min, max)`.
    pub fn range(self) -> (f64, f64) {
        match self {
            SparkleSize::Small => (8.0, 16.0),
            SparkleSize::Medium => (12.0, 24.0),
            SparkleSize::Large => (16.0, 32.0),
        }
    }
}

/// Density of the magical effects spawner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
}

named_options!(Intensity, "intensity", {
    Low => "low",
    Medium => "medium",
    High => "high",
});

impl Intensity {
    /// Elements spawned per wave.
    pub fn count(self) -> usize {
        match self {
            Intensity::Low => 15,
            Intensity::Medium => 25,
            Intensity::High => 40,
        }
    }
}

/// Kind of magical effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagicalVariant {
    #[default]
    Sparkles,
    Particles,
    Aurora,
    Constellation,
}

named_options!(MagicalVariant, "magical variant", {
    Sparkles => "sparkles",
    Particles => "particles",
    Aurora => "aurora",
    Constellation => "constellation",
});

impl MagicalVariant {
    /// Time between spawn waves in milliseconds.
    pub fn spawn_interval_ms(self) -> f64 {
        match self {
            MagicalVariant::Aurora => 8000.0,
            _ => 3000.0,
        }
    }
}

/// Named sparkle configuration bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SparklePreset {
    Gentle,
    Magical,
    Celebration,
    Rainbow,
}

named_options!(SparklePreset, "sparkle preset", {
    Gentle => "gentle",
    Magical => "magical",
    Celebration => "celebration",
    Rainbow => "rainbow",
});

/// Named floating-element configuration bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatingPreset {
    Bakery,
    Magical,
    Celebration,
    Nature,
}

named_options!(FloatingPreset, "floating preset", {
    Bakery => "bakery",
    Magical => "magical",
    Celebration => "celebration",
    Nature => "nature",
});
