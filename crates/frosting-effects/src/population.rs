//! Population lifecycle shared by spawner variants.

use kurbo::Point;

use crate::motion::{Motion, Pose};

/// A live entity: where it was spawned, how it moves, and how it looks.
#[derive(Debug, Clone)]
pub struct Particle<M, V> {
    /// Spawn sequence number, unique within the population.
    pub id: u64,
    pub anchor: Point,
    pub motion: M,
    pub look: V,
}

impl<M: Motion, V> Particle<M, V> {
    /// Current pose of this entity.
    pub fn pose(&self) -> Pose {
        self.motion.pose()
    }

    /// Current position: the anchor displaced by the pose offset.
    pub fn position(&self) -> Point {
        self.anchor + self.motion.pose().offset
    }
}

/// Spawns, ages and removes transient entities, replenishing toward a target.
#[derive(Debug, Clone)]
pub struct Population<M, V> {
    particles: Vec<Particle<M, V>>,
    target: usize,
    /// Most entities spawned by one replenish pass.
    batch: usize,
    active: bool,
    next_id: u64,
}

impl<M: Motion, V> Population<M, V> {
    pub fn new(target: usize, batch: usize, active: bool) -> Self {
        Self {
            particles: Vec::with_capacity(target),
            target,
            batch: batch.max(1),
            active,
            next_id: 0,
        }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Toggle replenishment. Existing entities keep aging either way.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle<M, V>> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle<M, V>> {
        self.particles.iter_mut()
    }

    /// Advance every entity by one frame and drop the expired ones.
    pub fn advance(&mut self, dt_ms: f64) {
        for particle in &mut self.particles {
            particle.motion.advance(dt_ms);
        }
        self.particles.retain(|p| !p.motion.is_expired());
    }

    /// While active, spawn up to one batch toward the target. Returns how many were spawned.
    pub fn replenish<F>(&mut self, spawn: F) -> usize
    where
        F: FnMut(u64) -> (Point, M, V),
    {
        if !self.active || self.particles.len() >= self.target {
            return 0;
        }
        let n = self.batch.min(self.target - self.particles.len());
        self.spawn(n, spawn)
    }

    /// One frame: [`advance`](Self::advance) then [`replenish`](Self::replenish).
    pub fn tick<F>(&mut self, dt_ms: f64, spawn: F) -> usize
    where
        F: FnMut(u64) -> (Point, M, V),
    {
        self.advance(dt_ms);
        self.replenish(spawn)
    }

    /// Spawn `n` entities regardless of target or activation.
    pub fn spawn<F>(&mut self, n: usize, mut spawn: F) -> usize
    where
        F: FnMut(u64) -> (Point, M, V),
    {
        for _ in 0..n {
            let id = self.next_id;
            self.next_id += 1;
            let (anchor, motion, look) = spawn(id);
            self.particles.push(Particle {
                id,
                anchor,
                motion,
                look,
            });
        }
        n
    }

    /// Add already-built entities regardless of target or activation.
    pub fn extend(&mut self, entities: impl IntoIterator<Item = (Point, M, V)>) -> usize {
        let before = self.particles.len();
        for (anchor, motion, look) in entities {
            let id = self.next_id;
            self.next_id += 1;
            self.particles.push(Particle {
                id,
                anchor,
                motion,
                look,
            });
        }
        self.particles.len() - before
    }

    /// Remove every entity.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
