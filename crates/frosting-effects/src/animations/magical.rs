//! Magical overlay effects.
//!
//! Elements are spawned in waves, one on activation and then one per
//! variant interval. Each element runs a keyframe track with a finite
//! lifetime and is removed once that lifetime has elapsed.

use frosting_core::{Intensity, MagicalVariant, Palette, Rgba};
use kurbo::{Point, Rect, Size, Vec2};
use rand::Rng;
use rand::rngs::StdRng;

use super::{between, unit};
use crate::chars::{PARTICLE_GLYPH, SPARKLE_GLYPH, STAR_GLYPH};
use crate::effect::{Simulation, StepContext};
use crate::motion::{Ease, KeyframeMotion, Keyframes, Pose, Repeat};
use crate::population::Population;
use crate::surface::{Glyph, GradientStop, Paint, Path, Surface};

const SPARKLE_LIFETIME_MS: f64 = 5000.0;
const PARTICLE_LIFETIME_MS: f64 = 7000.0;
const AURORA_LIFETIME_MS: f64 = 8000.0;
const STAR_LIFETIME_MS: f64 = 6000.0;
const LINK_LIFETIME_MS: f64 = 4000.0;

/// Chance that a star after the first is linked to a neighbor.
const LINK_PROBABILITY: f64 = 0.3;

const STAR_COLOR: Rgba = Rgba::WHITE;
const STAR_GLOW: [Rgba; 2] = [Rgba::rgb(0x3b, 0x82, 0xf6), Rgba::rgb(0x93, 0x33, 0xea)];
const LINK_COLOR: Rgba = Rgba::rgb(0x60, 0xa5, 0xfa);

#[derive(Debug, Clone, PartialEq)]
pub struct MagicalConfig {
    pub variant: MagicalVariant,
    pub intensity: Intensity,
    pub palette: Palette,
}

impl Default for MagicalConfig {
    fn default() -> Self {
        Self {
            variant: MagicalVariant::Sparkles,
            intensity: Intensity::Medium,
            palette: Palette::sparkle(),
        }
    }
}

/// What a magical element draws as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MagicalLook {
    Sparkle { size: f64, color: Rgba },
    Particle { color: Rgba },
    Aurora { colors: [Rgba; 3] },
    Star,
    /// Faint line of `length` starting at the anchor, rotated by `angle` degrees.
    Link { length: f64, angle: f64 },
}

type Spawned = (Point, KeyframeMotion, MagicalLook);

#[derive(Debug, Clone)]
pub struct MagicalField {
    config: MagicalConfig,
    population: Population<KeyframeMotion, MagicalLook>,
    since_wave_ms: f64,
    bounds: Size,
}

impl MagicalField {
    /// Create the field and spawn its first wave.
    pub fn new(config: MagicalConfig, bounds: Size, rng: &mut StdRng) -> Self {
        let mut field = Self {
            config,
            population: Population::new(0, 1, false),
            since_wave_ms: 0.0,
            bounds,
        };
        field.spawn_wave(rng);
        field
    }

    pub fn elements(&self) -> &Population<KeyframeMotion, MagicalLook> {
        &self.population
    }

    fn spawn_wave(&mut self, rng: &mut StdRng) {
        let bounds = self.bounds;
        let palette = &self.config.palette;
        let count = self.config.intensity.count();
        let wave: Vec<Spawned> = match self.config.variant {
            MagicalVariant::Sparkles => (0..count).map(|_| sparkle(palette, bounds, rng)).collect(),
            MagicalVariant::Particles => (0..count).map(|_| particle(palette, bounds, rng)).collect(),
            MagicalVariant::Aurora => vec![aurora(palette, bounds)],
            MagicalVariant::Constellation => constellation(count, bounds, rng),
        };
        tracing::trace!(
            variant = self.config.variant.name(),
            spawned = wave.len(),
            "magical wave"
        );
        self.population.extend(wave);
    }
}

fn random_point(bounds: Size, rng: &mut StdRng) -> Point {
    Point::new(unit(rng) * bounds.width, unit(rng) * bounds.height)
}

fn random_color(palette: &Palette, rng: &mut StdRng) -> Rgba {
    palette.color_at(rng.gen_range(0..palette.len().max(1)))
}

fn sparkle(palette: &Palette, bounds: Size, rng: &mut StdRng) -> Spawned {
    let anchor = random_point(bounds, rng);
    let look = MagicalLook::Sparkle {
        size: between(rng, 8.0, 20.0),
        color: random_color(palette, rng),
    };
    let rest = Pose::new(Vec2::ZERO, 0.0, 0.0, 0.0);
    let track = Keyframes::new(
        [
            (0.0, rest),
            (0.5, Pose::new(Vec2::ZERO, 180.0, 1.0, 1.0)),
            (1.0, rest),
        ],
        Ease::InOutQuad,
    );
    let duration = between(rng, 2000.0, 5000.0);
    let delay = unit(rng) * 2000.0;
    let motion = KeyframeMotion::new(track, duration, delay, Repeat::Forever)
        .with_lifetime(SPARKLE_LIFETIME_MS);
    (anchor, motion, look)
}

fn particle(palette: &Palette, bounds: Size, rng: &mut StdRng) -> Spawned {
    let anchor = Point::new(unit(rng) * bounds.width, bounds.height);
    let look = MagicalLook::Particle {
        color: random_color(palette, rng),
    };
    let h = bounds.height;
    let track = Keyframes::new(
        [
            (0.0, Pose::new(Vec2::ZERO, 0.0, 0.0, 0.0)),
            (0.1, Pose::new(Vec2::new(10.0, -0.1 * h), 0.0, 1.0, 1.0)),
            (0.9, Pose::new(Vec2::new(-20.0, -0.9 * h), 0.0, 1.0, 1.0)),
            (1.0, Pose::new(Vec2::new(-30.0, -h), 0.0, 0.0, 0.0)),
        ],
        Ease::OutQuad,
    );
    let duration = between(rng, 3000.0, 7000.0);
    let delay = unit(rng) * 2000.0;
    let motion = KeyframeMotion::new(track, duration, delay, Repeat::Once)
        .with_lifetime(PARTICLE_LIFETIME_MS);
    (anchor, motion, look)
}

fn aurora(palette: &Palette, bounds: Size) -> Spawned {
    let w = bounds.width;
    let key = |shift: f64, rotation: f64, opacity: f64| {
        Pose::new(Vec2::new(shift * w, 0.0), rotation, 1.0, opacity)
    };
    let track = Keyframes::new(
        [
            (0.0, key(0.0, 0.0, 0.3)),
            (0.25, key(0.1, 1.0, 0.5)),
            (0.5, key(-0.05, -0.5, 0.4)),
            (0.75, key(0.15, 0.8, 0.6)),
            (1.0, key(0.0, 0.0, 0.3)),
        ],
        Ease::InOutQuad,
    );
    let look = MagicalLook::Aurora {
        colors: [palette.color_at(0), palette.color_at(1), palette.color_at(2)],
    };
    let motion = KeyframeMotion::new(track, AURORA_LIFETIME_MS, 0.0, Repeat::Forever)
        .with_lifetime(AURORA_LIFETIME_MS);
    (Point::ORIGIN, motion, look)
}

fn constellation(count: usize, bounds: Size, rng: &mut StdRng) -> Vec<Spawned> {
    let twinkle = Keyframes::new(
        [
            (0.0, Pose::new(Vec2::ZERO, 0.0, 0.8, 0.3)),
            (0.5, Pose::new(Vec2::ZERO, 0.0, 1.2, 1.0)),
            (1.0, Pose::new(Vec2::ZERO, 0.0, 0.8, 0.3)),
        ],
        Ease::InOutQuad,
    );
    let fade = Keyframes::new(
        [
            (0.0, Pose::new(Vec2::ZERO, 0.0, 1.0, 0.0)),
            (0.5, Pose::new(Vec2::ZERO, 0.0, 1.0, 0.3)),
            (1.0, Pose::new(Vec2::ZERO, 0.0, 1.0, 0.0)),
        ],
        Ease::InOutQuad,
    );

    let mut spawned = Vec::with_capacity(count);
    for i in 0..count {
        let anchor = random_point(bounds, rng);
        let duration = between(rng, 1000.0, 3000.0);
        let delay = unit(rng) * 2000.0;
        let motion = KeyframeMotion::new(twinkle.clone(), duration, delay, Repeat::Forever)
            .with_lifetime(STAR_LIFETIME_MS);
        spawned.push((anchor, motion, MagicalLook::Star));

        if i > 0 && unit(rng) < LINK_PROBABILITY {
            let look = MagicalLook::Link {
                length: between(rng, 50.0, 150.0),
                angle: unit(rng) * 360.0,
            };
            let motion = KeyframeMotion::new(fade.clone(), LINK_LIFETIME_MS, 0.0, Repeat::Forever)
                .with_lifetime(LINK_LIFETIME_MS);
            spawned.push((anchor, motion, look));
        }
    }
    spawned
}

fn glow(center: Point, radius: f64, stops: Vec<GradientStop>) -> (Path, Paint) {
    (
        Path::circle(center, radius),
        Paint::Radial {
            center,
            radius,
            stops,
        },
    )
}

impl MagicalField {
    fn draw_aurora(&self, surface: &mut dyn Surface, colors: &[Rgba; 3], pose: &Pose) {
        let Size { width, height } = self.bounds;
        let reach = width.max(height) * 0.5;
        let centers = [
            Point::new(width * 0.5, 0.0),
            Point::new(0.0, height),
            Point::new(width, height),
        ];
        let area = Path::rect(Rect::new(-width * 0.2, 0.0, width * 1.2, height));

        surface.save();
        surface.translate(width * 0.5 + pose.offset.x, height * 0.5);
        surface.rotate(pose.rotation.to_radians());
        surface.translate(-width * 0.5, -height * 0.5);
        surface.set_alpha(pose.opacity);
        for (center, color) in centers.into_iter().zip(colors) {
            let paint = Paint::Radial {
                center,
                radius: reach,
                stops: vec![
                    GradientStop::new(0.0, *color),
                    GradientStop::new(1.0, color.with_alpha(0x00)),
                ],
            };
            surface.fill_path(&area, &paint);
        }
        surface.restore();
    }
}

impl Simulation for MagicalField {
    fn step(&mut self, ctx: &mut StepContext<'_>) {
        self.bounds = ctx.bounds;
        self.population.advance(ctx.dt_ms);

        let interval = self.config.variant.spawn_interval_ms();
        self.since_wave_ms += ctx.dt_ms;
        // One wave per step; a long gap does not replay missed waves.
        if self.since_wave_ms >= interval {
            self.since_wave_ms %= interval;
            self.spawn_wave(ctx.rng);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for particle in self.population.iter() {
            let pose = particle.pose();
            let at = particle.position();
            match particle.look {
                MagicalLook::Sparkle { size, color } => surface.draw_glyph(&Glyph {
                    position: at,
                    symbol: SPARKLE_GLYPH,
                    size,
                    scale: pose.scale,
                    rotation: pose.rotation,
                    color: Some(color),
                    opacity: pose.opacity,
                }),
                MagicalLook::Particle { color } => {
                    let (path, paint) = glow(
                        at,
                        6.0 * pose.scale,
                        vec![
                            GradientStop::new(0.0, color),
                            GradientStop::new(1.0, color.with_alpha(0x00)),
                        ],
                    );
                    surface.save();
                    surface.set_alpha(pose.opacity);
                    surface.fill_path(&path, &paint);
                    surface.restore();
                    surface.draw_glyph(&Glyph {
                        position: at,
                        symbol: PARTICLE_GLYPH,
                        size: 4.0,
                        scale: pose.scale,
                        rotation: 0.0,
                        color: Some(color),
                        opacity: pose.opacity,
                    });
                }
                MagicalLook::Aurora { colors } => self.draw_aurora(surface, &colors, &pose),
                MagicalLook::Star => {
                    let (path, paint) = glow(
                        at,
                        18.0 * pose.scale,
                        vec![
                            GradientStop::new(0.0, STAR_COLOR),
                            GradientStop::new(0.33, STAR_GLOW[0].with_alpha(0xa0)),
                            GradientStop::new(0.66, STAR_GLOW[1].with_alpha(0x60)),
                            GradientStop::new(1.0, STAR_GLOW[1].with_alpha(0x00)),
                        ],
                    );
                    surface.save();
                    surface.set_alpha(pose.opacity);
                    surface.fill_path(&path, &paint);
                    surface.restore();
                    surface.draw_glyph(&Glyph {
                        position: at,
                        symbol: STAR_GLYPH,
                        size: 6.0,
                        scale: pose.scale,
                        rotation: 0.0,
                        color: Some(STAR_COLOR),
                        opacity: pose.opacity,
                    });
                }
                MagicalLook::Link { length, angle } => {
                    let paint = Paint::Linear {
                        start: Point::ORIGIN,
                        end: Point::new(length, 0.0),
                        stops: vec![
                            GradientStop::new(0.0, LINK_COLOR.with_alpha(0x00)),
                            GradientStop::new(0.5, LINK_COLOR),
                            GradientStop::new(1.0, LINK_COLOR.with_alpha(0x00)),
                        ],
                    };
                    surface.save();
                    surface.translate(at.x, at.y);
                    surface.rotate(angle.to_radians());
                    surface.set_alpha(pose.opacity);
                    surface.fill_path(&Path::rect(Rect::new(0.0, -0.5, length, 0.5)), &paint);
                    surface.restore();
                }
            }
        }
    }

    fn population(&self) -> usize {
        self.population.len()
    }
}
