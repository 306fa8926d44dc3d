//! Frame scheduler: one running simulation per animation instance.

use kurbo::Size;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::effect::{EffectConfig, PointerEvent, Simulation, StepContext};
use crate::host::{FrameClock, FrameHandle, QueuedHost, ResizeSubscription, Viewport};
use crate::surface::Surface;

/// Frame duration assumed for the first frame after activation.
const FIRST_FRAME_MS: f64 = 1000.0 / 60.0;
/// Longest step a single frame may advance, so a stalled host does not
/// replay its whole gap at once.
const MAX_FRAME_MS: f64 = 100.0;

/// State that only exists while the instance is active.
#[derive(Debug)]
struct Running {
    simulation: Box<dyn Simulation>,
    rng: StdRng,
    pending: Option<FrameHandle>,
    resize: ResizeSubscription,
    last_frame_ms: Option<f64>,
    frames: u64,
}

/// Drives one simulation from host frame callbacks.
///
/// The loop is started by [`activate`](Self::activate) and runs until
/// [`deactivate`](Self::deactivate). A frame is only honored when its handle
/// is the one this instance is waiting for, so callbacks that were already
/// queued at teardown do nothing.
#[derive(Debug)]
pub struct Animator {
    config: EffectConfig,
    seeds: StdRng,
    running: Option<Running>,
}

impl Animator {
    /// Create an inactive animator. Each activation draws a fresh seed from `seed`.
    pub fn new(config: EffectConfig, seed: u64) -> Self {
        Self {
            config,
            seeds: StdRng::seed_from_u64(seed),
            running: None,
        }
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }

    /// Live entity count, zero while inactive.
    pub fn population(&self) -> usize {
        self.running
            .as_ref()
            .map_or(0, |r| r.simulation.population())
    }

    /// Frames simulated since the last activation.
    pub fn frames(&self) -> u64 {
        self.running.as_ref().map_or(0, |r| r.frames)
    }

    /// Start the frame loop.
    ///
    /// Does nothing when already active or when the surface has no drawing
    /// context. Returns whether a new loop was started.
    pub fn activate<H>(&mut self, host: &mut H, surface: &dyn Surface) -> bool
    where
        H: FrameClock + Viewport,
    {
        if self.running.is_some() {
            tracing::trace!(effect = self.config.label(), "already active");
            return false;
        }
        let Some(bounds) = surface.size() else {
            tracing::debug!(effect = self.config.label(), "surface unavailable");
            return false;
        };

        let mut rng = StdRng::seed_from_u64(self.seeds.next_u64());
        let simulation = self.config.build(bounds, &mut rng);
        tracing::debug!(
            effect = self.config.label(),
            width = bounds.width,
            height = bounds.height,
            population = simulation.population(),
            "activated"
        );

        self.running = Some(Running {
            simulation,
            rng,
            pending: Some(host.request_frame()),
            resize: host.subscribe_resize(),
            last_frame_ms: None,
            frames: 0,
        });
        true
    }

    /// Stop the loop and discard the population. Safe to call repeatedly.
    pub fn deactivate<H>(&mut self, host: &mut H)
    where
        H: FrameClock + Viewport,
    {
        let Some(running) = self.running.take() else {
            return;
        };
        if let Some(handle) = running.pending {
            host.cancel_frame(handle);
        }
        host.unsubscribe_resize(running.resize);
        tracing::debug!(
            effect = self.config.label(),
            frames = running.frames,
            "deactivated"
        );
    }

    /// Replace the configuration, tearing down and reseeding when it changed.
    pub fn reconfigure<H>(&mut self, config: EffectConfig, host: &mut H, surface: &dyn Surface)
    where
        H: FrameClock + Viewport,
    {
        if config == self.config {
            return;
        }
        let was_active = self.is_active();
        self.deactivate(host);
        tracing::debug!(from = self.config.label(), to = config.label(), "reconfigure");
        self.config = config;
        if was_active {
            self.activate(host, surface);
        }
    }

    /// Frame callback. Updates then draws, then requests the next frame.
    ///
    /// Returns whether the frame ran. Stale handles and inactive instances
    /// return `false` without touching the simulation or the surface.
    pub fn on_frame<C>(
        &mut self,
        handle: FrameHandle,
        now_ms: f64,
        clock: &mut C,
        surface: &mut dyn Surface,
    ) -> bool
    where
        C: FrameClock,
    {
        let Some(running) = self.running.as_mut() else {
            return false;
        };
        if running.pending != Some(handle) {
            tracing::trace!(?handle, "stale frame ignored");
            return false;
        }
        running.pending = None;

        let Some(bounds) = surface.size() else {
            running.pending = Some(clock.request_frame());
            return false;
        };

        let dt_ms = running
            .last_frame_ms
            .map_or(FIRST_FRAME_MS, |last| (now_ms - last).clamp(0.0, MAX_FRAME_MS));
        running.last_frame_ms = Some(now_ms);

        let mut ctx = StepContext {
            bounds,
            dt_ms,
            rng: &mut running.rng,
        };
        running.simulation.step(&mut ctx);
        surface.clear();
        running.simulation.draw(surface);
        surface.present();
        running.frames += 1;

        running.pending = Some(clock.request_frame());
        true
    }

    /// Deliver every frame queued on `host`. Returns how many ran.
    pub fn pump(&mut self, host: &mut QueuedHost, surface: &mut dyn Surface, now_ms: f64) -> usize {
        host.take_due()
            .into_iter()
            .filter(|handle| self.on_frame(*handle, now_ms, host, surface))
            .count()
    }

    /// Viewport resize notification. Entity state is kept as is.
    pub fn on_resize(&mut self, size: Size, surface: &mut dyn Surface) {
        if self.running.is_some() {
            surface.resize(size);
        }
    }

    /// Route pointer input to the running simulation.
    pub fn pointer(&mut self, event: PointerEvent) {
        if let Some(running) = self.running.as_mut() {
            running.simulation.pointer(event, &mut running.rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use frosting_core::{
        AnimationSpeed, BackgroundVariant, Intensity, MagicalVariant, Palette, Rgba, Trigger,
    };
    use kurbo::Point;

    use super::*;
    use crate::animations::magical::MagicalConfig;
    use crate::animations::sparkles::{BURST_SIZE, SPAWN_BATCH, SparkleConfig};
    use crate::effect::BackgroundConfig;
    use crate::recording::{DrawCall, RecordingSurface};

    fn background(variant: BackgroundVariant) -> EffectConfig {
        EffectConfig::Background(BackgroundConfig {
            variant,
            speed: AnimationSpeed::Medium,
            palette: Palette::background(),
        })
    }

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Size::new(800.0, 600.0))
    }

    fn run(
        animator: &mut Animator,
        host: &mut QueuedHost,
        surface: &mut RecordingSurface,
        frames: usize,
    ) {
        for i in 0..frames {
            animator.pump(host, surface, i as f64 * FIRST_FRAME_MS);
        }
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut host = QueuedHost::new();
        let surface = surface();
        let mut animator = Animator::new(background(BackgroundVariant::Bubbles), 7);
        assert!(animator.activate(&mut host, &surface));
        assert!(!animator.activate(&mut host, &surface));
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(host.resize_subscribers(), 1);
    }

    #[test]
    fn test_unavailable_surface_is_noop() {
        let mut host = QueuedHost::new();
        let surface = RecordingSurface::unavailable();
        let mut animator = Animator::new(background(BackgroundVariant::Waves), 7);
        assert!(!animator.activate(&mut host, &surface));
        assert!(!animator.is_active());
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_each_frame_clears_then_draws() {
        let mut host = QueuedHost::new();
        let mut surface = surface();
        let mut animator = Animator::new(background(BackgroundVariant::Geometric), 3);
        animator.activate(&mut host, &surface);
        run(&mut animator, &mut host, &mut surface, 3);
        assert_eq!(animator.frames(), 3);
        let clears = surface
            .calls()
            .iter()
            .filter(|c| matches!(c, DrawCall::Clear))
            .count();
        assert_eq!(clears, 3);
        assert_eq!(surface.calls()[0], DrawCall::Clear);
        assert_eq!(host.pending_frames(), 1);
    }

    #[test]
    fn test_teardown_stops_drawing() {
        let mut host = QueuedHost::new();
        let mut surface = surface();
        let mut animator = Animator::new(background(BackgroundVariant::Organic), 11);
        animator.activate(&mut host, &surface);
        run(&mut animator, &mut host, &mut surface, 2);

        // A callback already handed out by the host when teardown happens.
        let queued = host.take_due();
        animator.deactivate(&mut host);
        animator.deactivate(&mut host);
        let before = surface.calls().to_vec();

        for handle in queued {
            assert!(!animator.on_frame(handle, 100.0, &mut host, &mut surface));
        }
        run(&mut animator, &mut host, &mut surface, 5);
        assert_eq!(surface.calls(), before.as_slice());
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.resize_subscribers(), 0);
        assert_eq!(animator.population(), 0);
    }

    #[test]
    fn test_stale_handle_ignored() {
        let mut host = QueuedHost::new();
        let mut surface = surface();
        let mut animator = Animator::new(background(BackgroundVariant::Waves), 1);
        animator.activate(&mut host, &surface);
        assert!(!animator.on_frame(FrameHandle(999), 0.0, &mut host, &mut surface));
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_surface_lost_mid_loop_skips_frame() {
        let mut host = QueuedHost::new();
        let mut surface = surface();
        let mut animator = Animator::new(background(BackgroundVariant::Bubbles), 5);
        animator.activate(&mut host, &surface);
        surface.set_available(None);
        run(&mut animator, &mut host, &mut surface, 2);
        assert!(surface.calls().is_empty());
        assert_eq!(host.pending_frames(), 1);

        surface.set_available(Some(Size::new(800.0, 600.0)));
        run(&mut animator, &mut host, &mut surface, 1);
        assert_eq!(animator.frames(), 1);
    }

    #[test]
    fn test_reconfigure_reseeds_population() {
        let mut host = QueuedHost::new();
        let surface = surface();
        let mut animator = Animator::new(background(BackgroundVariant::Bubbles), 9);
        animator.activate(&mut host, &surface);
        assert_eq!(animator.population(), 20);

        animator.reconfigure(background(BackgroundVariant::Organic), &mut host, &surface);
        assert!(animator.is_active());
        assert_eq!(animator.population(), 8);
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(host.resize_subscribers(), 1);

        // Unchanged configuration keeps the running loop.
        let frames_before = host.pending_frames();
        animator.reconfigure(background(BackgroundVariant::Organic), &mut host, &surface);
        assert_eq!(host.pending_frames(), frames_before);
    }

    #[test]
    fn test_resize_only_while_active() {
        let mut host = QueuedHost::new();
        let mut surface = surface();
        let mut animator = Animator::new(background(BackgroundVariant::Waves), 2);
        animator.on_resize(Size::new(10.0, 10.0), &mut surface);
        assert_eq!(surface.size(), Some(Size::new(800.0, 600.0)));

        animator.activate(&mut host, &surface);
        animator.on_resize(Size::new(1024.0, 768.0), &mut surface);
        assert_eq!(surface.size(), Some(Size::new(1024.0, 768.0)));
    }

    #[test]
    fn test_empty_palette_renders_with_default() {
        for variant in BackgroundVariant::ALL.iter().copied() {
            let mut host = QueuedHost::new();
            let mut surface = surface();
            let config = EffectConfig::Background(BackgroundConfig {
                variant,
                speed: AnimationSpeed::Fast,
                palette: Palette::new(Vec::new()),
            });
            let mut animator = Animator::new(config, 4);
            assert!(animator.activate(&mut host, &surface));
            run(&mut animator, &mut host, &mut surface, 2);
            if variant != BackgroundVariant::None {
                assert!(surface.fill_count() > 0, "{variant} drew nothing");
            }
        }
    }

    #[test]
    fn test_sparkle_population_bound_and_burst() {
        let mut host = QueuedHost::new();
        let mut surface = RecordingSurface::new(Size::new(300.0, 200.0));
        let config = SparkleConfig {
            count: 10,
            trigger: Trigger::Always,
            palette: Palette::new(vec![Rgba::rgb(255, 0, 0)]),
            ..SparkleConfig::default()
        };
        let mut animator = Animator::new(EffectConfig::Sparkles(config), 21);
        animator.activate(&mut host, &surface);
        for i in 0..200 {
            animator.pump(&mut host, &mut surface, i as f64 * FIRST_FRAME_MS);
            assert!(animator.population() <= 10 + SPAWN_BATCH);
        }

        let before = animator.population();
        animator.pointer(PointerEvent::Click(Point::new(50.0, 50.0)));
        assert_eq!(animator.population(), before);

        let config = SparkleConfig {
            trigger: Trigger::Click,
            ..SparkleConfig::default()
        };
        animator.reconfigure(EffectConfig::Sparkles(config), &mut host, &surface);
        assert_eq!(animator.population(), 0);
        animator.pointer(PointerEvent::Click(Point::new(50.0, 50.0)));
        assert_eq!(animator.population(), BURST_SIZE);
    }

    #[test]
    fn test_frame_gap_is_clamped() {
        let mut host = QueuedHost::new();
        let mut surface = surface();
        let config = MagicalConfig {
            variant: MagicalVariant::Sparkles,
            intensity: Intensity::Medium,
            ..MagicalConfig::default()
        };
        let mut animator = Animator::new(EffectConfig::Magical(config), 13);
        animator.activate(&mut host, &surface);
        animator.pump(&mut host, &mut surface, 0.0);
        // An hour-long stall advances the field by a single bounded step.
        animator.pump(&mut host, &mut surface, 3_600_000.0);
        assert_eq!(animator.frames(), 2);
        assert_eq!(animator.population(), Intensity::Medium.count());
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let record = || {
            let mut host = QueuedHost::new();
            let mut surface = surface();
            let mut animator = Animator::new(background(BackgroundVariant::Geometric), 42);
            animator.activate(&mut host, &surface);
            run(&mut animator, &mut host, &mut surface, 4);
            surface.take_calls()
        };
        assert_eq!(record(), record());
    }
}
