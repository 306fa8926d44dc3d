//! Motion profiles: how an entity's pose evolves over its life.
//!
//! Two backends implement [`Motion`]. [`Drift`] steps imperatively once per
//! frame (velocity, spin, linear fade). [`KeyframeMotion`] evaluates a
//! keyframe track computed once at spawn time against its own clock, which
//! can loop, pause, and expire.

use kurbo::Vec2;

/// Entity pose relative to its spawn anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub offset: Vec2,
    /// Rotation in degrees.
    pub rotation: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

impl Pose {
    pub fn new(offset: Vec2, rotation: f64, scale: f64, opacity: f64) -> Self {
        Self {
            offset,
            rotation,
            scale,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

/// Lifecycle contract shared by every motion backend.
pub trait Motion {
    /// Advance by one frame that took `dt_ms` milliseconds.
    fn advance(&mut self, dt_ms: f64);
    /// Pose at the current instant.
    fn pose(&self) -> Pose;
    /// Whether the entity should be removed.
    fn is_expired(&self) -> bool;
}

/// Per-frame imperative motion with a finite life.
#[derive(Debug, Clone, PartialEq)]
pub struct Drift {
    pub velocity: Vec2,
    /// Degrees per frame.
    pub rotation_speed: f64,
    /// Opacity lost per frame.
    pub fade: f64,
    /// Frames elapsed.
    pub life: u32,
    /// Frames until expiry.
    pub max_life: u32,
    pose: Pose,
}

impl Drift {
    pub fn new(
        velocity: Vec2,
        rotation: f64,
        rotation_speed: f64,
        opacity: f64,
        fade: f64,
        max_life: u32,
    ) -> Self {
        Self {
            velocity,
            rotation_speed,
            fade,
            life: 0,
            max_life,
            pose: Pose::new(Vec2::ZERO, rotation, 1.0, opacity),
        }
    }
}

impl Motion for Drift {
    fn advance(&mut self, _dt_ms: f64) {
        self.pose.offset += self.velocity;
        self.pose.rotation += self.rotation_speed;
        self.pose.opacity = (self.pose.opacity - self.fade).clamp(0.0, 1.0);
        self.life = self.life.saturating_add(1);
    }

    fn pose(&self) -> Pose {
        self.pose
    }

    fn is_expired(&self) -> bool {
        self.life >= self.max_life || self.pose.opacity <= 0.0
    }
}

/// Interpolation contract for keyframe values.
pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Pose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Pose {
            offset: a.offset.lerp(b.offset, t),
            rotation: f64::lerp(&a.rotation, &b.rotation, t),
            scale: f64::lerp(&a.scale, &b.scale, t),
            opacity: f64::lerp(&a.opacity, &b.opacity, t).clamp(0.0, 1.0),
        }
    }
}

/// Easing curve, applied per keyframe segment or per iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ease {
    #[default]
    Linear,
    OutQuad,
    InOutQuad,
    OutCubic,
}

impl Ease {
    /// Map normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Ease::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// One key of a track; `offset` is the fraction of the loop in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe<T> {
    pub offset: f64,
    pub value: T,
}

/// Keyframe track, keys sorted by offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes<T> {
    keys: Vec<Keyframe<T>>,
    ease: Ease,
}

impl<T: Lerp + Clone> Keyframes<T> {
    /// Build a track from `(offset, value)` pairs. Keys are sorted by offset.
    pub fn new(keys: impl IntoIterator<Item = (f64, T)>, ease: Ease) -> Self {
        let mut keys: Vec<Keyframe<T>> = keys
            .into_iter()
            .map(|(offset, value)| Keyframe {
                offset: offset.clamp(0.0, 1.0),
                value,
            })
            .collect();
        keys.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self { keys, ease }
    }

    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    /// Value at loop progress `progress` in `[0, 1]`, or `None` for an empty track.
    pub fn sample(&self, progress: f64) -> Option<T> {
        let first = self.keys.first()?;
        let idx = self.keys.partition_point(|k| k.offset <= progress);
        if idx == 0 {
            return Some(first.value.clone());
        }
        if idx >= self.keys.len() {
            return self.keys.last().map(|k| k.value.clone());
        }
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.offset - a.offset;
        if span <= 0.0 {
            return Some(b.value.clone());
        }
        let t = self.ease.apply((progress - a.offset) / span);
        Some(T::lerp(&a.value, &b.value, t))
    }
}

/// How often a keyframe track plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Play once and hold the last key.
    Once,
    /// Loop until removed.
    Forever,
}

/// Keyframe-evaluated motion with its own pausable clock.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeMotion {
    track: Keyframes<Pose>,
    duration_ms: f64,
    delay_ms: f64,
    repeat: Repeat,
    /// Easing applied to the whole iteration before keys are sampled.
    iteration_ease: Ease,
    /// Removal deadline measured on the entity clock.
    lifetime_ms: Option<f64>,
    elapsed_ms: f64,
    paused: bool,
}

impl KeyframeMotion {
    pub fn new(track: Keyframes<Pose>, duration_ms: f64, delay_ms: f64, repeat: Repeat) -> Self {
        Self {
            track,
            duration_ms: duration_ms.max(1.0),
            delay_ms: delay_ms.max(0.0),
            repeat,
            iteration_ease: Ease::Linear,
            lifetime_ms: None,
            elapsed_ms: 0.0,
            paused: false,
        }
    }

    /// Expire the entity once its clock reaches `lifetime_ms`.
    pub fn with_lifetime(mut self, lifetime_ms: f64) -> Self {
        self.lifetime_ms = Some(lifetime_ms);
        self
    }

    /// Ease loop progress once per iteration; keys are then sampled with the
    /// track's own segment easing.
    pub fn with_iteration_ease(mut self, ease: Ease) -> Self {
        self.iteration_ease = ease;
        self
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Loop progress in `[0, 1]` at the current clock.
    pub fn progress(&self) -> f64 {
        let local = self.elapsed_ms - self.delay_ms;
        if local <= 0.0 {
            return 0.0;
        }
        match self.repeat {
            Repeat::Once => (local / self.duration_ms).min(1.0),
            Repeat::Forever => (local % self.duration_ms) / self.duration_ms,
        }
    }
}

impl Motion for KeyframeMotion {
    fn advance(&mut self, dt_ms: f64) {
        if !self.paused {
            self.elapsed_ms += dt_ms.max(0.0);
        }
    }

    fn pose(&self) -> Pose {
        self.track
            .sample(self.iteration_ease.apply(self.progress()))
            .unwrap_or_default()
    }

    fn is_expired(&self) -> bool {
        let finished = self.repeat == Repeat::Once
            && self.elapsed_ms >= self.delay_ms + self.duration_ms;
        let outlived = self.lifetime_ms.is_some_and(|l| self.elapsed_ms >= l);
        finished || outlived
    }
}
