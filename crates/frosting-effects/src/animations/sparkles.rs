//! Sparkle population manager.
//!
//! Sparkles drift, spin and fade with a finite life. The trigger decides
//! when the population is replenished: always, only while hovered, or as
//! fixed-size bursts at each click.

use frosting_core::{AnimationSpeed, Palette, Rgba, SparkleSize, Trigger};
use kurbo::{Point, Size, Vec2};
use rand::rngs::StdRng;

use super::{between, centered, unit};
use crate::chars::SPARKLE_GLYPH;
use crate::effect::{PointerEvent, Simulation, StepContext};
use crate::motion::Drift;
use crate::population::Population;
use crate::surface::{Glyph, Surface};

/// Opacity lost per frame.
pub const OPACITY_DECAY: f64 = 0.02;
/// Most sparkles spawned per frame while replenishing.
pub const SPAWN_BATCH: usize = 3;
/// Sparkles spawned by one click.
pub const BURST_SIZE: usize = 8;
/// Placement area used while the container is unmeasured.
pub const FALLBACK_CONTAINER: Size = Size::new(300.0, 200.0);

#[derive(Debug, Clone, PartialEq)]
pub struct SparkleConfig {
    /// Target population.
    pub count: usize,
    pub palette: Palette,
    pub size: SparkleSize,
    pub speed: AnimationSpeed,
    pub trigger: Trigger,
}

impl Default for SparkleConfig {
    fn default() -> Self {
        Self {
            count: 12,
            palette: Palette::sparkle(),
            size: SparkleSize::Medium,
            speed: AnimationSpeed::Medium,
            trigger: Trigger::Hover,
        }
    }
}

/// Appearance fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkleLook {
    pub size: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone)]
pub struct SparkleField {
    config: SparkleConfig,
    population: Population<Drift, SparkleLook>,
    bounds: Size,
}

impl SparkleField {
    pub fn new(config: SparkleConfig, bounds: Size) -> Self {
        let active = config.trigger == Trigger::Always;
        Self {
            population: Population::new(config.count, SPAWN_BATCH, active),
            config,
            bounds,
        }
    }

    pub fn is_active(&self) -> bool {
        self.population.is_active()
    }

    pub fn sparkles(&self) -> &Population<Drift, SparkleLook> {
        &self.population
    }

    /// Placement area, substituting the fallback for a zero-area container.
    pub fn container(&self) -> Size {
        if self.bounds.is_zero_area() {
            FALLBACK_CONTAINER
        } else {
            self.bounds
        }
    }
}

/// Fresh sparkle with randomized kinematics, at `at` or anywhere in `container`.
fn sparkle(
    config: &SparkleConfig,
    container: Size,
    at: Option<Point>,
    rng: &mut StdRng,
    id: u64,
) -> (Point, Drift, SparkleLook) {
    let m = config.speed.multiplier();
    let (min, max) = config.size.range();
    let look = SparkleLook {
        size: between(rng, min, max),
        color: config.palette.color_at(id as usize),
    };
    let anchor = at.unwrap_or_else(|| {
        Point::new(unit(rng) * container.width, unit(rng) * container.height)
    });
    let opacity = between(rng, 0.2, 1.0);
    let max_life = between(rng, 60.0, 120.0).ceil() as u32;
    let velocity = Vec2::new(centered(rng, 2.0) * m, centered(rng, 2.0) * m);
    let rotation = unit(rng) * 360.0;
    let rotation_speed = centered(rng, 5.0) * m;
    let motion = Drift::new(
        velocity,
        rotation,
        rotation_speed,
        opacity,
        OPACITY_DECAY,
        max_life,
    );
    (anchor, motion, look)
}

impl Simulation for SparkleField {
    fn step(&mut self, ctx: &mut StepContext<'_>) {
        self.bounds = ctx.bounds;
        let container = self.container();
        let config = &self.config;
        let spawned = self
            .population
            .tick(ctx.dt_ms, |id| sparkle(config, container, None, ctx.rng, id));
        if spawned > 0 {
            tracing::trace!(spawned, live = self.population.len(), "sparkles replenished");
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for particle in self.population.iter() {
            let pose = particle.pose();
            surface.draw_glyph(&Glyph {
                position: particle.position(),
                symbol: SPARKLE_GLYPH,
                size: particle.look.size,
                scale: pose.scale,
                rotation: pose.rotation,
                color: Some(particle.look.color),
                opacity: pose.opacity,
            });
        }
    }

    fn population(&self) -> usize {
        self.population.len()
    }

    fn pointer(&mut self, event: PointerEvent, rng: &mut StdRng) {
        match (self.config.trigger, event) {
            (Trigger::Hover, PointerEvent::Enter) => self.population.set_active(true),
            (Trigger::Hover, PointerEvent::Leave) => self.population.set_active(false),
            (Trigger::Click, PointerEvent::Click(at)) => {
                let container = self.container();
                let config = &self.config;
                self.population
                    .spawn(BURST_SIZE, |id| sparkle(config, container, Some(at), rng, id));
                tracing::trace!(x = at.x, y = at.y, "sparkle burst");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::motion::Motion;
    use crate::recording::{DrawCall, RecordingSurface};

    fn tick(field: &mut SparkleField, rng: &mut StdRng) {
        let bounds = field.bounds;
        field.step(&mut StepContext {
            bounds,
            dt_ms: 16.0,
            rng,
        });
    }

    fn always(count: usize) -> SparkleConfig {
        SparkleConfig {
            count,
            trigger: Trigger::Always,
            ..SparkleConfig::default()
        }
    }

    #[test]
    fn test_population_never_exceeds_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = SparkleField::new(always(12), Size::new(400.0, 300.0));
        for _ in 0..1000 {
            tick(&mut field, &mut rng);
            assert!(field.population() <= 12);
        }
        assert!(field.population() > 0);
    }

    #[test]
    fn test_opacity_stays_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = SparkleField::new(always(20), Size::new(400.0, 300.0));
        for _ in 0..300 {
            tick(&mut field, &mut rng);
            for particle in field.sparkles().iter() {
                let opacity = particle.pose().opacity;
                assert!((0.0..=1.0).contains(&opacity));
            }
        }
    }

    #[test]
    fn test_every_sparkle_expires_within_max_life() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = SparkleField::new(always(12), Size::new(400.0, 300.0));
        tick(&mut field, &mut rng);
        let first: Vec<u64> = field.sparkles().iter().map(|p| p.id).collect();
        for particle in field.sparkles().iter() {
            assert!((60..=120).contains(&particle.motion.max_life));
        }
        for _ in 0..120 {
            tick(&mut field, &mut rng);
        }
        assert!(
            field
                .sparkles()
                .iter()
                .all(|p| !first.contains(&p.id) && !p.motion.is_expired())
        );
    }

    #[test]
    fn test_hover_leave_lets_population_fade_out() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = SparkleConfig {
            count: 6,
            ..SparkleConfig::default()
        };
        let mut field = SparkleField::new(config, Size::new(200.0, 200.0));
        tick(&mut field, &mut rng);
        assert_eq!(field.population(), 0);

        field.pointer(PointerEvent::Enter, &mut rng);
        for _ in 0..5 {
            tick(&mut field, &mut rng);
        }
        assert_eq!(field.population(), 6);

        field.pointer(PointerEvent::Leave, &mut rng);
        tick(&mut field, &mut rng);
        assert!(field.population() > 0);
        for _ in 0..60 {
            tick(&mut field, &mut rng);
        }
        assert_eq!(field.population(), 0);
    }

    #[test]
    fn test_click_burst_spawns_at_click_point() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = SparkleConfig {
            count: 4,
            trigger: Trigger::Click,
            ..SparkleConfig::default()
        };
        let mut field = SparkleField::new(config, Size::new(200.0, 200.0));
        let at = Point::new(40.0, 25.0);
        field.pointer(PointerEvent::Click(at), &mut rng);
        assert_eq!(field.population(), BURST_SIZE);
        assert!(field.sparkles().iter().all(|p| p.anchor == at));

        // Bursts ignore the target and never replenish on their own.
        field.pointer(PointerEvent::Click(at), &mut rng);
        assert_eq!(field.population(), 2 * BURST_SIZE);
        field.pointer(PointerEvent::Enter, &mut rng);
        assert!(!field.is_active());
    }

    #[test]
    fn test_colors_cycle_by_spawn_order() {
        let mut rng = StdRng::seed_from_u64(6);
        let palette = Palette::new(vec![Rgba::rgb(255, 0, 0), Rgba::rgb(0, 0, 255)]);
        let config = SparkleConfig {
            count: 5,
            palette: palette.clone(),
            trigger: Trigger::Always,
            ..SparkleConfig::default()
        };
        let mut field = SparkleField::new(config, Size::new(100.0, 100.0));
        tick(&mut field, &mut rng);
        tick(&mut field, &mut rng);
        for particle in field.sparkles().iter() {
            assert_eq!(
                particle.look.color,
                palette.colors()[particle.id as usize % 2]
            );
        }
    }

    #[test]
    fn test_unmeasured_container_uses_fallback() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = SparkleField::new(always(30), Size::ZERO);
        assert_eq!(field.container(), FALLBACK_CONTAINER);
        for _ in 0..10 {
            tick(&mut field, &mut rng);
        }
        for particle in field.sparkles().iter() {
            assert!(particle.anchor.x < FALLBACK_CONTAINER.width);
            assert!(particle.anchor.y < FALLBACK_CONTAINER.height);
        }
    }

    #[test]
    fn test_draws_one_glyph_per_sparkle() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut field = SparkleField::new(always(9), Size::new(100.0, 100.0));
        tick(&mut field, &mut rng);
        let mut surface = RecordingSurface::new(Size::new(100.0, 100.0));
        field.draw(&mut surface);
        assert_eq!(surface.glyph_count(), 3);
        assert!(surface.calls().iter().all(|c| matches!(
            c,
            DrawCall::Glyph { glyph } if glyph.symbol == SPARKLE_GLYPH && glyph.color.is_some()
        )));
    }
}
