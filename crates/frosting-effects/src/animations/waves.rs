//! Layered sine waves filled down to the bottom edge.

use std::f64::consts::FRAC_PI_2;

use frosting_core::{AnimationSpeed, Palette, Rgba};
use kurbo::{Point, Size};

use crate::effect::{Simulation, StepContext};
use crate::surface::{GradientStop, Paint, Path, Surface};

/// Horizontal distance between sampled curve points.
const SAMPLE_STEP: f64 = 5.0;

/// One wave layer. Layers are drawn in palette order.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    pub color: Rgba,
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    /// Time-counter multiplier.
    pub speed: f64,
    pub opacity: f64,
}

impl Wave {
    /// Layer `index` of the stack.
    pub fn layer(index: usize, color: Rgba, speed: AnimationSpeed) -> Self {
        let i = index as f64;
        Self {
            color,
            amplitude: 50.0 + i * 20.0,
            frequency: 0.01 + i * 0.005,
            phase: i * FRAC_PI_2,
            speed: 0.02 * speed.multiplier() * (1.0 + i * 0.3),
            opacity: (0.1 + i * 0.05).clamp(0.0, 1.0),
        }
    }

    /// Vertical displacement at `x` for time counter `time`.
    pub fn offset_at(&self, x: f64, time: f64) -> f64 {
        let t = time * self.speed;
        (x * self.frequency + t + self.phase).sin() * self.amplitude
            + (x * self.frequency * 2.0 + t * 1.5 + self.phase).sin() * self.amplitude * 0.5
    }
}

/// The waves background: one layer per palette color.
#[derive(Debug, Clone)]
pub struct WaveField {
    waves: Vec<Wave>,
    /// Frame counter. Starts one below zero so the first drawn frame is at zero.
    time: f64,
    bounds: Size,
}

impl WaveField {
    pub fn new(palette: &Palette, speed: AnimationSpeed, bounds: Size) -> Self {
        let waves = palette
            .colors()
            .iter()
            .enumerate()
            .map(|(i, color)| Wave::layer(i, *color, speed))
            .collect();
        Self {
            waves,
            time: -1.0,
            bounds,
        }
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    fn outline(&self, wave: &Wave) -> Path {
        let Size { width, height } = self.bounds;
        let mid = height / 2.0;
        let mut path = Path::new();
        path.move_to(Point::new(0.0, mid));
        let mut x = 0.0;
        while x <= width {
            path.line_to(Point::new(x, mid + wave.offset_at(x, self.time)));
            x += SAMPLE_STEP;
        }
        path.line_to(Point::new(width, height))
            .line_to(Point::new(0.0, height));
        path
    }
}

impl Simulation for WaveField {
    fn step(&mut self, ctx: &mut StepContext<'_>) {
        self.bounds = ctx.bounds;
        self.time += 1.0;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for wave in &self.waves {
            let paint = Paint::Linear {
                start: Point::ORIGIN,
                end: Point::new(0.0, self.bounds.height),
                stops: vec![
                    GradientStop::new(0.0, wave.color.with_alpha(0x00)),
                    GradientStop::new(0.5, wave.color.with_alpha(0x40)),
                    GradientStop::new(1.0, wave.color.with_alpha(0x00)),
                ],
            };
            surface.save();
            surface.set_alpha(wave.opacity);
            surface.fill_path(&self.outline(wave), &paint);
            surface.restore();
        }
    }

    fn population(&self) -> usize {
        self.waves.len()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::recording::{DrawCall, RecordingSurface};

    fn step(field: &mut WaveField, bounds: Size) {
        let mut rng = StdRng::seed_from_u64(0);
        field.step(&mut StepContext {
            bounds,
            dt_ms: 16.0,
            rng: &mut rng,
        });
    }

    #[test]
    fn test_one_layer_per_color_in_order() {
        let palette = Palette::background();
        let field = WaveField::new(&palette, AnimationSpeed::Medium, Size::new(100.0, 100.0));
        assert_eq!(field.population(), 5);
        let colors: Vec<Rgba> = field.waves().iter().map(|w| w.color).collect();
        assert_eq!(colors, palette.colors());
        assert_eq!(field.waves()[4].amplitude, 130.0);
        assert!((field.waves()[4].opacity - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_offset_matches_closed_form() {
        let palette = Palette::new(vec![Rgba::rgb(0x66, 0x7e, 0xea)]);
        let bounds = Size::new(400.0, 300.0);
        let mut field = WaveField::new(&palette, AnimationSpeed::Medium, bounds);
        step(&mut field, bounds);
        assert_eq!(field.time(), 0.0);
        step(&mut field, bounds);
        let wave = &field.waves()[0];
        let expected = (0.02f64).sin() * 50.0 + (0.03f64).sin() * 25.0;
        assert!((wave.offset_at(0.0, field.time()) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_speed_scales_phase_velocity() {
        let slow = Wave::layer(1, Rgba::WHITE, AnimationSpeed::Slow);
        let fast = Wave::layer(1, Rgba::WHITE, AnimationSpeed::Fast);
        assert!((fast.speed / slow.speed - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_draw_fills_each_layer_with_its_opacity() {
        let bounds = Size::new(50.0, 40.0);
        let mut field = WaveField::new(&Palette::background(), AnimationSpeed::Fast, bounds);
        step(&mut field, bounds);
        let mut surface = RecordingSurface::new(bounds);
        field.draw(&mut surface);
        assert_eq!(surface.fill_count(), 5);
        let alphas: Vec<f64> = surface
            .calls()
            .iter()
            .filter_map(|c| match c {
                DrawCall::SetAlpha { alpha } => Some(*alpha),
                _ => None,
            })
            .collect();
        assert_eq!(alphas.len(), 5);
        assert!(alphas.windows(2).all(|w| w[0] < w[1]));
    }
}
