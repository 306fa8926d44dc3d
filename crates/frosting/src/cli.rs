//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use frosting_config::Config;
use frosting_core::{
    AnimationSpeed, BackgroundVariant, Direction, FloatingPreset, Intensity, MagicalVariant,
    SparklePreset, SparkleSize, Trigger,
};
use tracing::Level;

/// Decorative bakery animations for the terminal.
#[derive(Parser, Debug)]
#[command(name = "frosting", version, about)]
pub struct Cli {
    /// Config file to load instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Background variant (none, waves, bubbles, geometric, organic)
    #[arg(long)]
    pub background: Option<BackgroundVariant>,

    /// Speed class applied to every effect (slow, medium, fast)
    #[arg(long)]
    pub speed: Option<AnimationSpeed>,

    /// Comma separated `#rrggbb` colors for the background palette
    #[arg(long, value_delimiter = ',')]
    pub colors: Option<Vec<String>>,

    /// Sparkle preset (gentle, magical, celebration, rainbow)
    #[arg(long)]
    pub sparkle_preset: Option<SparklePreset>,

    /// Sparkle activation policy (always, hover, click)
    #[arg(long)]
    pub trigger: Option<Trigger>,

    /// Sparkle glyph size class (small, medium, large)
    #[arg(long)]
    pub sparkle_size: Option<SparkleSize>,

    /// Floating element preset (bakery, magical, celebration, nature)
    #[arg(long)]
    pub floating_preset: Option<FloatingPreset>,

    /// Floating element travel direction (up, down, random)
    #[arg(long)]
    pub direction: Option<Direction>,

    /// Target population for sparkles and floating elements
    #[arg(long)]
    pub count: Option<usize>,

    /// Enable a magical overlay (sparkles, particles, aurora, constellation)
    #[arg(long)]
    pub magical: Option<MagicalVariant>,

    /// Magical overlay intensity (low, medium, high)
    #[arg(long)]
    pub intensity: Option<Intensity>,

    /// Disable the sparkle card
    #[arg(long)]
    pub no_sparkles: bool,

    /// Disable floating elements
    #[arg(long)]
    pub no_floating: bool,

    /// Seed for every random source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frames per second
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: Option<u32>,

    /// Write logs to this file. Logging is off otherwise.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Maximum log level
    #[arg(long, default_value = "info")]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one effect headlessly and print its draw calls as JSON
    Record(RecordArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Effect to record
    #[arg(long, value_enum, default_value_t = RecordTarget::Background)]
    pub effect: RecordTarget,

    /// Number of frames to record
    #[arg(long, default_value_t = 60)]
    pub frames: u32,

    /// Surface width in logical pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Surface height in logical pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTarget {
    Background,
    Sparkles,
    Floating,
    Magical,
}

impl Cli {
    /// Layer command line overrides on top of a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(variant) = self.background {
            config.background.variant = variant;
        }
        if let Some(speed) = self.speed {
            config.background.speed = speed;
            config.sparkles.speed = Some(speed);
            config.floating.speed = Some(speed);
        }
        if let Some(colors) = &self.colors {
            config.background.colors = colors.clone();
        }
        if let Some(preset) = self.sparkle_preset {
            config.sparkles.preset = Some(preset);
        }
        if let Some(trigger) = self.trigger {
            config.sparkles.trigger = trigger;
        }
        if let Some(size) = self.sparkle_size {
            config.sparkles.size = Some(size);
        }
        if let Some(preset) = self.floating_preset {
            config.floating.preset = Some(preset);
        }
        if let Some(direction) = self.direction {
            config.floating.direction = Some(direction);
        }
        if let Some(count) = self.count {
            config.sparkles.count = Some(count);
            config.floating.count = Some(count);
        }
        if let Some(variant) = self.magical {
            config.magical.enabled = true;
            config.magical.variant = variant;
        }
        if let Some(intensity) = self.intensity {
            config.magical.intensity = intensity;
        }
        if self.no_sparkles {
            config.sparkles.enabled = false;
        }
        if self.no_floating {
            config.floating.enabled = false;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
    }
}
