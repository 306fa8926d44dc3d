//! Decorative animation engine.
//!
//! Every effect is a [`Simulation`]: a population of entities with an update
//! rule applied once per frame and a draw rule issued against a [`Surface`].
//! An [`Animator`] owns one simulation, drives it from the frames a
//! [`FrameClock`] hands out, and tears it down cleanly on deactivation.
//!
//! Background variants (waves, bubbles, geometric shapes, organic blobs) mutate
//! a fixed population in place. Spawner variants (sparkles, floating glyphs,
//! magical effects) share [`Population`], which handles birth, aging and
//! removal over any [`Motion`] backend.

mod animations;
mod chars;
mod effect;
mod host;
mod motion;
mod population;
mod presets;
mod raster;
mod recording;
mod scheduler;
mod surface;

pub use animations::bubbles::{BUBBLE_COUNT, Bubble, BubbleField};
pub use animations::floating::{
    DEFAULT_ELEMENTS, FloatingConfig, FloatingElement, FloatingField, FloatingLook,
};
pub use animations::geometric::{SHAPE_COUNT, Shape, ShapeField, ShapeKind};
pub use animations::magical::{MagicalConfig, MagicalField, MagicalLook};
pub use animations::organic::{BLOB_COUNT, BLOB_POINTS, Blob, BlobField};
pub use animations::sparkles::{
    BURST_SIZE, FALLBACK_CONTAINER, OPACITY_DECAY, SPAWN_BATCH, SparkleConfig, SparkleField,
    SparkleLook,
};
pub use animations::waves::{Wave, WaveField};
pub use effect::{BackgroundConfig, EffectConfig, PointerEvent, Simulation, StepContext};
pub use host::{FrameClock, FrameHandle, QueuedHost, ResizeSubscription, Viewport};
pub use motion::{Drift, Ease, Keyframe, KeyframeMotion, Keyframes, Lerp, Motion, Pose, Repeat};
pub use population::{Particle, Population};
pub use raster::{PlacedGlyph, RasterSurface};
pub use recording::{DrawCall, RecordingSurface};
pub use scheduler::Animator;
pub use surface::{Glyph, GradientStop, Paint, Path, Surface};
