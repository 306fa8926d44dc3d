//! Breathing blobs.

use std::f64::consts::TAU;

use frosting_core::{AnimationSpeed, Palette, Rgba};
use kurbo::{Point, Size, Vec2};
use rand::rngs::StdRng;

use super::{between, centered, unit, wrap};
use crate::effect::{Simulation, StepContext};
use crate::surface::{GradientStop, Paint, Path, Surface};

pub const BLOB_COUNT: usize = 8;
pub const BLOB_POINTS: usize = 8;

const BREATH_AMPLITUDE: f64 = 20.0;
const BREATH_RATE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub center: Point,
    pub base_radius: f64,
    /// Per-vertex radius multipliers.
    pub points: [f64; BLOB_POINTS],
    pub rotation: f64,
    pub rotation_speed: f64,
    pub drift: Vec2,
    pub color: Rgba,
    pub opacity: f64,
    pub phase: f64,
}

impl Blob {
    fn random(
        index: usize,
        palette: &Palette,
        speed: AnimationSpeed,
        bounds: Size,
        rng: &mut StdRng,
    ) -> Self {
        let m = speed.multiplier();
        Self {
            center: Point::new(unit(rng) * bounds.width, unit(rng) * bounds.height),
            base_radius: between(rng, 50.0, 150.0),
            points: std::array::from_fn(|_| between(rng, 0.75, 1.25)),
            rotation: unit(rng) * TAU,
            rotation_speed: between(rng, 0.002, 0.007) * m,
            drift: Vec2::new(centered(rng, 0.3) * m, centered(rng, 0.3) * m),
            color: palette.color_at(index),
            opacity: between(rng, 0.05, 0.2),
            phase: unit(rng) * TAU,
        }
    }

    /// Outline around the blob's own origin at time counter `time`.
    pub fn outline(&self, time: f64) -> Vec<Point> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, multiplier)| {
                let angle = i as f64 / BLOB_POINTS as f64 * TAU;
                let breath = (time * BREATH_RATE + self.phase + i as f64).sin() * BREATH_AMPLITUDE;
                let radius = self.base_radius * multiplier + breath;
                Point::new(angle.cos() * radius, angle.sin() * radius)
            })
            .collect()
    }
}

/// The organic background.
#[derive(Debug, Clone)]
pub struct BlobField {
    blobs: Vec<Blob>,
    time: f64,
}

impl BlobField {
    pub fn new(palette: &Palette, speed: AnimationSpeed, bounds: Size, rng: &mut StdRng) -> Self {
        let blobs = (0..BLOB_COUNT)
            .map(|i| Blob::random(i, palette, speed, bounds, rng))
            .collect();
        Self { blobs, time: -1.0 }
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }
}

impl Simulation for BlobField {
    fn step(&mut self, ctx: &mut StepContext<'_>) {
        let Size { width, height } = ctx.bounds;
        self.time += 1.0;
        for blob in &mut self.blobs {
            blob.center += blob.drift;
            blob.rotation += blob.rotation_speed;
            blob.center.x = wrap(blob.center.x, blob.base_radius, width);
            blob.center.y = wrap(blob.center.y, blob.base_radius, height);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for blob in &self.blobs {
            let paint = Paint::Radial {
                center: Point::ORIGIN,
                radius: blob.base_radius * 2.0,
                stops: vec![
                    GradientStop::new(0.0, blob.color.with_alpha(0x80)),
                    GradientStop::new(0.5, blob.color.with_alpha(0x40)),
                    GradientStop::new(1.0, blob.color.with_alpha(0x00)),
                ],
            };
            surface.save();
            surface.translate(blob.center.x, blob.center.y);
            surface.rotate(blob.rotation);
            surface.set_alpha(blob.opacity);
            surface.fill_path(&Path::polygon(blob.outline(self.time)), &paint);
            surface.restore();
        }
    }

    fn population(&self) -> usize {
        self.blobs.len()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn field(seed: u64) -> BlobField {
        let mut rng = StdRng::seed_from_u64(seed);
        BlobField::new(
            &Palette::background(),
            AnimationSpeed::Medium,
            Size::new(800.0, 600.0),
            &mut rng,
        )
    }

    #[test]
    fn test_multipliers_in_range() {
        let field = field(6);
        assert_eq!(field.population(), BLOB_COUNT);
        for blob in field.blobs() {
            assert!(blob.points.iter().all(|m| (0.75..1.25).contains(m)));
            assert!((50.0..150.0).contains(&blob.base_radius));
            assert!((0.05..0.2).contains(&blob.opacity));
        }
    }

    #[test]
    fn test_outline_breathes_within_amplitude() {
        let field = field(7);
        let blob = &field.blobs()[0];
        for time in [0.0, 10.0, 157.0] {
            let outline = blob.outline(time);
            assert_eq!(outline.len(), BLOB_POINTS);
            for (i, p) in outline.iter().enumerate() {
                let base = blob.base_radius * blob.points[i];
                let r = p.to_vec2().hypot();
                assert!((r - base).abs() <= BREATH_AMPLITUDE + 1e-9);
            }
        }
    }

    #[test]
    fn test_blobs_wrap_by_base_radius() {
        let bounds = Size::new(200.0, 150.0);
        let mut rng = StdRng::seed_from_u64(30);
        let mut field = BlobField::new(&Palette::sparkle(), AnimationSpeed::Fast, bounds, &mut rng);
        for _ in 0..3000 {
            field.step(&mut StepContext {
                bounds,
                dt_ms: 16.0,
                rng: &mut rng,
            });
        }
        for blob in field.blobs() {
            let r = blob.base_radius;
            assert!((-r..=bounds.width + r).contains(&blob.center.x));
            assert!((-r..=bounds.height + r).contains(&blob.center.y));
        }
    }
}
