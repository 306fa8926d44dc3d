//! Drifting, spinning polygons.

use std::f64::consts::{FRAC_PI_3, TAU};

use frosting_core::{AnimationSpeed, Palette, Rgba};
use kurbo::{Point, Rect, Size, Vec2};
use rand::Rng;
use rand::rngs::StdRng;

use super::{between, centered, unit, wrap};
use crate::effect::{Simulation, StepContext};
use crate::surface::{GradientStop, Paint, Path, Surface};

pub const SHAPE_COUNT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Triangle,
    Square,
    Hexagon,
}

impl ShapeKind {
    const ALL: [ShapeKind; 3] = [ShapeKind::Triangle, ShapeKind::Square, ShapeKind::Hexagon];

    /// Outline centered on the origin.
    pub fn outline(self, size: f64) -> Path {
        match self {
            ShapeKind::Triangle => Path::polygon([
                Point::new(0.0, -size),
                Point::new(-size * 0.866, size * 0.5),
                Point::new(size * 0.866, size * 0.5),
            ]),
            ShapeKind::Square => Path::rect(Rect::new(
                -size * 0.5,
                -size * 0.5,
                size * 0.5,
                size * 0.5,
            )),
            ShapeKind::Hexagon => Path::polygon((0..6).map(|i| {
                let angle = f64::from(i) * FRAC_PI_3;
                Point::new(angle.cos() * size, angle.sin() * size)
            })),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub center: Point,
    pub size: f64,
    /// Radians.
    pub rotation: f64,
    pub rotation_speed: f64,
    pub drift: Vec2,
    pub color: Rgba,
    pub opacity: f64,
}

impl Shape {
    fn random(
        index: usize,
        palette: &Palette,
        speed: AnimationSpeed,
        bounds: Size,
        rng: &mut StdRng,
    ) -> Self {
        let m = speed.multiplier();
        Self {
            kind: ShapeKind::ALL[rng.gen_range(0..ShapeKind::ALL.len())],
            center: Point::new(unit(rng) * bounds.width, unit(rng) * bounds.height),
            size: between(rng, 20.0, 60.0),
            rotation: unit(rng) * TAU,
            rotation_speed: between(rng, 0.01, 0.03) * m,
            drift: Vec2::new(centered(rng, 0.5) * m, centered(rng, 0.5) * m),
            color: palette.color_at(index),
            opacity: between(rng, 0.05, 0.25),
        }
    }
}

/// The geometric background.
#[derive(Debug, Clone)]
pub struct ShapeField {
    shapes: Vec<Shape>,
}

impl ShapeField {
    pub fn new(palette: &Palette, speed: AnimationSpeed, bounds: Size, rng: &mut StdRng) -> Self {
        let shapes = (0..SHAPE_COUNT)
            .map(|i| Shape::random(i, palette, speed, bounds, rng))
            .collect();
        Self { shapes }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

impl Simulation for ShapeField {
    fn step(&mut self, ctx: &mut StepContext<'_>) {
        let Size { width, height } = ctx.bounds;
        for shape in &mut self.shapes {
            shape.center += shape.drift;
            shape.rotation += shape.rotation_speed;
            shape.center.x = wrap(shape.center.x, shape.size, width);
            shape.center.y = wrap(shape.center.y, shape.size, height);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for shape in &self.shapes {
            let paint = Paint::Radial {
                center: Point::ORIGIN,
                radius: shape.size,
                stops: vec![
                    GradientStop::new(0.0, shape.color.with_alpha(0x60)),
                    GradientStop::new(1.0, shape.color.with_alpha(0x00)),
                ],
            };
            surface.save();
            surface.translate(shape.center.x, shape.center.y);
            surface.rotate(shape.rotation);
            surface.set_alpha(shape.opacity);
            surface.fill_path(&shape.kind.outline(shape.size), &paint);
            surface.restore();
        }
    }

    fn population(&self) -> usize {
        self.shapes.len()
    }
}
