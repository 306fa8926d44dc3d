//! Rising, pulsing bubbles.

use std::f64::consts::TAU;

use frosting_core::{AnimationSpeed, Palette, Rgba};
use kurbo::{Point, Size};
use rand::rngs::StdRng;

use super::{between, unit};
use crate::effect::{Simulation, StepContext};
use crate::surface::{GradientStop, Paint, Path, Surface};

pub const BUBBLE_COUNT: usize = 20;

/// Radius swing of the pulse.
const PULSE_AMPLITUDE: f64 = 5.0;

const HIGHLIGHT: Rgba = Rgba::new(0xff, 0xff, 0xff, 0x40);

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub center: Point,
    pub radius: f64,
    /// Upward distance per frame.
    pub speed: f64,
    pub color: Rgba,
    pub opacity: f64,
    pub pulse_phase: f64,
    pub pulse_speed: f64,
}

impl Bubble {
    fn random(
        index: usize,
        palette: &Palette,
        speed: AnimationSpeed,
        bounds: Size,
        rng: &mut StdRng,
    ) -> Self {
        Self {
            center: Point::new(unit(rng) * bounds.width, unit(rng) * bounds.height),
            radius: between(rng, 10.0, 40.0),
            speed: between(rng, 1.0, 3.0) * speed.multiplier(),
            color: palette.color_at(index),
            opacity: between(rng, 0.1, 0.4),
            pulse_phase: unit(rng) * TAU,
            pulse_speed: between(rng, 0.02, 0.07),
        }
    }

    /// Radius at time counter `time`.
    pub fn pulse_radius(&self, time: f64) -> f64 {
        self.radius + (time * self.pulse_speed + self.pulse_phase).sin() * PULSE_AMPLITUDE
    }
}

/// The bubbles background.
#[derive(Debug, Clone)]
pub struct BubbleField {
    bubbles: Vec<Bubble>,
    time: f64,
    bounds: Size,
}

impl BubbleField {
    pub fn new(palette: &Palette, speed: AnimationSpeed, bounds: Size, rng: &mut StdRng) -> Self {
        let bubbles = (0..BUBBLE_COUNT)
            .map(|i| Bubble::random(i, palette, speed, bounds, rng))
            .collect();
        Self {
            bubbles,
            time: -1.0,
            bounds,
        }
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }
}

impl Simulation for BubbleField {
    fn step(&mut self, ctx: &mut StepContext<'_>) {
        self.bounds = ctx.bounds;
        self.time += 1.0;
        for bubble in &mut self.bubbles {
            bubble.center.y -= bubble.speed;
            if bubble.center.y + bubble.radius < 0.0 {
                bubble.center.y = ctx.bounds.height + bubble.radius;
                bubble.center.x = unit(ctx.rng) * ctx.bounds.width;
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for bubble in &self.bubbles {
            let r = bubble.pulse_radius(self.time);
            let body = Paint::Radial {
                center: bubble.center,
                radius: r,
                stops: vec![
                    GradientStop::new(0.0, bubble.color.with_alpha(0x60)),
                    GradientStop::new(0.7, bubble.color.with_alpha(0x20)),
                    GradientStop::new(1.0, bubble.color.with_alpha(0x00)),
                ],
            };
            surface.save();
            surface.set_alpha(bubble.opacity);
            surface.fill_path(&Path::circle(bubble.center, r), &body);

            let highlight = Point::new(bubble.center.x - r * 0.3, bubble.center.y - r * 0.3);
            surface.set_alpha(bubble.opacity * 0.8);
            surface.fill_path(&Path::circle(highlight, r * 0.2), &Paint::Solid(HIGHLIGHT));
            surface.restore();
        }
    }

    fn population(&self) -> usize {
        self.bubbles.len()
    }
}
