//! Floating glyphs that loop along a general direction.
//!
//! Every element gets a keyframe track computed once at spawn time (drift,
//! rotation, scale, duration, start delay) and loops it until the field is
//! dropped. Hovering an element pauses only that element's clock.

use frosting_core::{AnimationSpeed, Direction, Rgba};
use kurbo::{Point, Size, Vec2};
use rand::rngs::StdRng;

use super::{between, centered, unit};
use crate::effect::{PointerEvent, Simulation, StepContext};
use crate::motion::{Ease, KeyframeMotion, Keyframes, Motion, Pose, Repeat};
use crate::population::Population;
use crate::surface::{Glyph, Surface};

/// Fraction of the rendered glyph size that counts as a hit.
const HIT_RADIUS: f64 = 0.75;

/// One kind of floating glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingElement {
    pub glyph: char,
    /// Font size in pixels.
    pub size: f64,
    /// Relative speed; divides the loop duration.
    pub speed: f64,
    pub color: Option<Rgba>,
}

impl FloatingElement {
    pub const fn new(glyph: char, size: f64, speed: f64) -> Self {
        Self {
            glyph,
            size,
            speed,
            color: None,
        }
    }

    pub const fn colored(glyph: char, size: f64, speed: f64, color: Rgba) -> Self {
        Self {
            glyph,
            size,
            speed,
            color: Some(color),
        }
    }
}

/// Element set used when none is configured.
pub const DEFAULT_ELEMENTS: [FloatingElement; 6] = [
    FloatingElement::new('🍩', 24.0, 1.0),
    FloatingElement::new('✨', 16.0, 1.2),
    FloatingElement::new('🌟', 20.0, 0.8),
    FloatingElement::new('💫', 18.0, 1.1),
    FloatingElement::new('🎂', 22.0, 0.9),
    FloatingElement::new('🧁', 20.0, 1.3),
];

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingConfig {
    /// Element kinds, assigned round-robin.
    pub elements: Vec<FloatingElement>,
    pub count: usize,
    pub speed: AnimationSpeed,
    pub direction: Direction,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            elements: DEFAULT_ELEMENTS.to_vec(),
            count: 15,
            speed: AnimationSpeed::Medium,
            direction: Direction::Up,
        }
    }
}

/// Appearance of a spawned element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingLook {
    pub glyph: char,
    pub size: f64,
    pub color: Option<Rgba>,
}

#[derive(Debug, Clone)]
pub struct FloatingField {
    population: Population<KeyframeMotion, FloatingLook>,
}

impl FloatingField {
    /// Spawn every element up front. An empty element list uses [`DEFAULT_ELEMENTS`].
    pub fn new(config: FloatingConfig, bounds: Size, rng: &mut StdRng) -> Self {
        let elements = if config.elements.is_empty() {
            DEFAULT_ELEMENTS.to_vec()
        } else {
            config.elements
        };
        let mut population = Population::new(config.count, 1, false);
        population.spawn(config.count, |id| {
            let element = &elements[id as usize % elements.len()];
            spawn(element, config.speed, config.direction, bounds, rng)
        });
        tracing::trace!(count = config.count, direction = %config.direction, "floating spawned");
        Self { population }
    }

    pub fn elements(&self) -> &Population<KeyframeMotion, FloatingLook> {
        &self.population
    }

    fn hit(position: Point, look: &FloatingLook, pose: &Pose, at: Point) -> bool {
        position.distance(at) < look.size * pose.scale * HIT_RADIUS
    }
}

fn spawn(
    element: &FloatingElement,
    speed: AnimationSpeed,
    direction: Direction,
    bounds: Size,
    rng: &mut StdRng,
) -> (Point, KeyframeMotion, FloatingLook) {
    let Size { width, height } = bounds;
    let left = unit(rng) * width;
    let top = match direction {
        Direction::Up => height,
        Direction::Down => -0.1 * height,
        Direction::Random => unit(rng) * height,
    };

    let base_speed = element.speed * speed.multiplier();
    let base_speed = if base_speed > 0.0 { base_speed } else { 1.0 };
    let duration_ms = between(rng, 8.0, 12.0) / base_speed * 1000.0;
    let drift = centered(rng, 200.0);
    let rotation = centered(rng, 360.0);
    let scale = between(rng, 0.8, 1.2);

    let track = match direction {
        Direction::Up | Direction::Down => {
            let sign = if direction == Direction::Up { -1.0 } else { 1.0 };
            let key = |f: f64, rise: f64, opacity: f64| {
                Pose::new(
                    Vec2::new(drift * f, sign * rise * height),
                    rotation * f,
                    scale,
                    opacity,
                )
            };
            Keyframes::new(
                [
                    (0.0, key(0.0, 0.0, 0.0)),
                    (0.1, key(0.3, 0.2, 1.0)),
                    (0.9, key(0.7, 0.8, 1.0)),
                    (1.0, key(1.0, 1.1, 0.0)),
                ],
                Ease::Linear,
            )
        }
        Direction::Random => {
            let vertical = centered(rng, 200.0);
            let start_opacity = between(rng, 0.3, 0.8);
            let end_opacity = between(rng, 0.2, 0.7);
            Keyframes::new(
                [
                    (0.0, Pose::new(Vec2::ZERO, 0.0, scale, start_opacity)),
                    (
                        0.5,
                        Pose::new(
                            Vec2::new(drift * 0.5, vertical * 0.5),
                            rotation * 0.5,
                            scale * 1.1,
                            1.0,
                        ),
                    ),
                    (
                        1.0,
                        Pose::new(
                            Vec2::new(drift, vertical),
                            rotation,
                            scale * 0.9,
                            end_opacity,
                        ),
                    ),
                ],
                Ease::Linear,
            )
        }
    };

    let delay_ms = unit(rng) * 2000.0;
    let motion = KeyframeMotion::new(track, duration_ms, delay_ms, Repeat::Forever)
        .with_iteration_ease(Ease::OutQuad);
    let look = FloatingLook {
        glyph: element.glyph,
        size: element.size,
        color: element.color,
    };
    (Point::new(left, top), motion, look)
}

impl Simulation for FloatingField {
    fn step(&mut self, ctx: &mut StepContext<'_>) {
        self.population.advance(ctx.dt_ms);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for particle in self.population.iter() {
            let pose = particle.pose();
            surface.draw_glyph(&Glyph {
                position: particle.position(),
                symbol: particle.look.glyph,
                size: particle.look.size,
                scale: pose.scale,
                rotation: pose.rotation,
                color: particle.look.color,
                opacity: pose.opacity,
            });
        }
    }

    fn population(&self) -> usize {
        self.population.len()
    }

    fn pointer(&mut self, event: PointerEvent, _rng: &mut StdRng) {
        match event {
            PointerEvent::Move(at) => {
                for particle in self.population.iter_mut() {
                    let pose = particle.motion.pose();
                    let position = particle.anchor + pose.offset;
                    if Self::hit(position, &particle.look, &pose, at) {
                        particle.motion.pause();
                    } else {
                        particle.motion.resume();
                    }
                }
            }
            PointerEvent::Leave => {
                for particle in self.population.iter_mut() {
                    particle.motion.resume();
                }
            }
            PointerEvent::Enter | PointerEvent::Click(_) => {}
        }
    }
}
