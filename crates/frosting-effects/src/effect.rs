//! Simulation contract and the configuration that selects a variant.

use std::fmt;

use frosting_core::{AnimationSpeed, BackgroundVariant, Palette};
use kurbo::{Point, Size};
use rand::rngs::StdRng;

use crate::animations::bubbles::BubbleField;
use crate::animations::floating::{FloatingConfig, FloatingField};
use crate::animations::geometric::ShapeField;
use crate::animations::magical::{MagicalConfig, MagicalField};
use crate::animations::organic::BlobField;
use crate::animations::sparkles::{SparkleConfig, SparkleField};
use crate::animations::waves::WaveField;
use crate::surface::Surface;

/// Per-frame inputs handed to [`Simulation::step`].
pub struct StepContext<'a> {
    /// Current logical surface dimensions.
    pub bounds: Size,
    /// Milliseconds since the previous frame.
    pub dt_ms: f64,
    /// The instance's seeded random source.
    pub rng: &'a mut StdRng,
}

/// Pointer input routed to a running simulation, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Enter,
    Leave,
    Move(Point),
    Click(Point),
}

/// One animation variant: a population with an update rule and a draw rule.
pub trait Simulation: fmt::Debug {
    /// Apply the update rule once.
    fn step(&mut self, ctx: &mut StepContext<'_>);
    /// Issue draw calls for the current state. The surface is already cleared.
    fn draw(&self, surface: &mut dyn Surface);
    /// Number of live entities.
    fn population(&self) -> usize;
    /// React to pointer input. Most variants ignore it.
    fn pointer(&mut self, _event: PointerEvent, _rng: &mut StdRng) {}
}

/// Configuration of the four background variants.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundConfig {
    pub variant: BackgroundVariant,
    pub speed: AnimationSpeed,
    pub palette: Palette,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            variant: BackgroundVariant::Waves,
            speed: AnimationSpeed::Medium,
            palette: Palette::background(),
        }
    }
}

/// Selects which simulation an [`Animator`](crate::Animator) runs.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectConfig {
    Background(BackgroundConfig),
    Sparkles(SparkleConfig),
    Floating(FloatingConfig),
    Magical(MagicalConfig),
}

impl EffectConfig {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            EffectConfig::Background(c) => c.variant.name(),
            EffectConfig::Sparkles(_) => "sparkles",
            EffectConfig::Floating(_) => "floating",
            EffectConfig::Magical(c) => c.variant.name(),
        }
    }

    /// Seed a fresh population for a surface of `bounds`.
    pub fn build(&self, bounds: Size, rng: &mut StdRng) -> Box<dyn Simulation> {
        match self {
            EffectConfig::Background(c) => match c.variant {
                BackgroundVariant::None => Box::new(Blank),
                BackgroundVariant::Waves => Box::new(WaveField::new(&c.palette, c.speed, bounds)),
                BackgroundVariant::Bubbles => {
                    Box::new(BubbleField::new(&c.palette, c.speed, bounds, rng))
                }
                BackgroundVariant::Geometric => {
                    Box::new(ShapeField::new(&c.palette, c.speed, bounds, rng))
                }
                BackgroundVariant::Organic => {
                    Box::new(BlobField::new(&c.palette, c.speed, bounds, rng))
                }
            },
            EffectConfig::Sparkles(c) => Box::new(SparkleField::new(c.clone(), bounds)),
            EffectConfig::Floating(c) => Box::new(FloatingField::new(c.clone(), bounds, rng)),
            EffectConfig::Magical(c) => Box::new(MagicalField::new(c.clone(), bounds, rng)),
        }
    }
}

/// The `none` background: draws nothing.
#[derive(Debug)]
struct Blank;

impl Simulation for Blank {
    fn step(&mut self, _ctx: &mut StepContext<'_>) {}

    fn draw(&self, _surface: &mut dyn Surface) {}

    fn population(&self) -> usize {
        0
    }
}
