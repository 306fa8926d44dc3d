//! Animation variants.
//!
//! Background variants (`waves`, `bubbles`, `geometric`, `organic`) own a
//! fixed population mutated in place each frame. Spawner variants
//! (`sparkles`, `floating`, `magical`) are built on
//! [`Population`](crate::Population).

pub mod bubbles;
pub mod floating;
pub mod geometric;
pub mod magical;
pub mod organic;
pub mod sparkles;
pub mod waves;

use rand::Rng;
use rand::rngs::StdRng;

/// Uniform sample in `[0, 1)`.
pub(crate) fn unit(rng: &mut StdRng) -> f64 {
    rng.gen_range(0.0..1.0)
}

/// Uniform sample in `[lo, hi)`. Returns `lo` for an empty range.
pub(crate) fn between(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Uniform sample in `[-span / 2, span / 2)`.
pub(crate) fn centered(rng: &mut StdRng, span: f64) -> f64 {
    (unit(rng) - 0.5) * span
}

/// Toroidal wrap for an entity of half-extent `extent` on the axis `[0, limit]`.
///
/// An entity is moved to the opposite side only once it has fully left the
/// axis, so it re-enters from just outside the visible area.
pub(crate) fn wrap(value: f64, extent: f64, limit: f64) -> f64 {
    if value > limit + extent {
        -extent
    } else if value < -extent {
        limit + extent
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_wrap_both_edges() {
        assert_eq!(wrap(131.0, 30.0, 100.0), -30.0);
        assert_eq!(wrap(-31.0, 30.0, 100.0), 130.0);
        assert_eq!(wrap(130.0, 30.0, 100.0), 130.0);
        assert_eq!(wrap(-30.0, 30.0, 100.0), -30.0);
    }

    #[test]
    fn test_samplers_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = between(&mut rng, 10.0, 40.0);
            assert!((10.0..40.0).contains(&v));
            let c = centered(&mut rng, 2.0);
            assert!((-1.0..1.0).contains(&c));
        }
        assert_eq!(between(&mut rng, 5.0, 5.0), 5.0);
    }
}
