//! Glyph constants for glyph-drawn entities.

/// Sparkle glyph used by the sparkle manager and the magical sparkles.
pub const SPARKLE_GLYPH: char = '✨';

/// Constellation star.
pub const STAR_GLYPH: char = '✦';

/// Core of a rising magical particle.
pub const PARTICLE_GLYPH: char = '•';
