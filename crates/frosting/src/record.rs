//! Headless recording: run one effect against a [`RecordingSurface`] and dump
//! every frame's draw calls.

use std::io::Write;

use frosting_config::Config;
use frosting_effects::{Animator, DrawCall, EffectConfig, PointerEvent, QueuedHost, RecordingSurface};
use kurbo::{Point, Size};
use serde::Serialize;

use crate::cli::{RecordArgs, RecordTarget};

#[derive(Debug, Serialize)]
struct RecordedFrame {
    frame: u32,
    time_ms: f64,
    population: usize,
    calls: Vec<DrawCall>,
}

/// Effect the record target selects. Disabled sections are recorded anyway.
fn effect_for(config: &Config, target: RecordTarget) -> EffectConfig {
    match target {
        RecordTarget::Background => config.background_effect(),
        RecordTarget::Sparkles => EffectConfig::Sparkles(config.sparkles.to_config()),
        RecordTarget::Floating => EffectConfig::Floating(config.floating.to_config()),
        RecordTarget::Magical => EffectConfig::Magical(config.magical.to_config()),
    }
}

pub fn run(config: &Config, args: &RecordArgs, seed: u64, out: impl Write) -> color_eyre::Result<()> {
    let size = Size::new(args.width.max(0.0), args.height.max(0.0));
    let effect = effect_for(config, args.effect);
    tracing::info!(effect = effect.label(), frames = args.frames, seed, "recording");

    let mut host = QueuedHost::new();
    let mut surface = RecordingSurface::new(size);
    let mut animator = Animator::new(effect, seed);
    animator.activate(&mut host, &surface);

    // Hover and click sparkles stay empty without a pointer.
    animator.pointer(PointerEvent::Enter);
    animator.pointer(PointerEvent::Click(Point::new(size.width / 2.0, size.height / 2.0)));

    let frame_ms = 1000.0 / f64::from(config.frame_rate.max(1));
    let mut frames = Vec::new();
    for frame in 0..args.frames {
        let time_ms = f64::from(frame) * frame_ms;
        animator.pump(&mut host, &mut surface, time_ms);
        frames.push(RecordedFrame {
            frame,
            time_ms,
            population: animator.population(),
            calls: surface.take_calls(),
        });
    }
    animator.deactivate(&mut host);

    serde_json::to_writer_pretty(out, &frames)?;
    Ok(())
}
