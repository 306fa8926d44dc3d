//! Named configuration bundles for the sparkle and floating effects.

use frosting_core::{
    AnimationSpeed, Direction, FloatingPreset, Palette, Rgba, SparklePreset, SparkleSize, Trigger,
};

use crate::animations::floating::{FloatingConfig, FloatingElement};
use crate::animations::sparkles::SparkleConfig;

const fn hex(rgb: u32) -> Rgba {
    Rgba::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

fn hex_palette(colors: &[u32]) -> Palette {
    Palette::new(colors.iter().copied().map(hex).collect())
}

impl From<SparklePreset> for SparkleConfig {
    /// Preset values with the default `hover` trigger.
    fn from(preset: SparklePreset) -> Self {
        let (count, palette, size, speed) = match preset {
            SparklePreset::Gentle => (
                6,
                hex_palette(&[0xe0e7ff, 0xc7d2fe, 0xa5b4fc]),
                SparkleSize::Small,
                AnimationSpeed::Slow,
            ),
            SparklePreset::Magical => (
                12,
                hex_palette(&[0x9333ea, 0x3b82f6, 0xec4899, 0x10b981]),
                SparkleSize::Medium,
                AnimationSpeed::Medium,
            ),
            SparklePreset::Celebration => (
                20,
                hex_palette(&[0xf59e0b, 0xef4444, 0x10b981, 0x3b82f6, 0x8b5cf6]),
                SparkleSize::Large,
                AnimationSpeed::Fast,
            ),
            SparklePreset::Rainbow => (
                15,
                hex_palette(&[
                    0xef4444, 0xf97316, 0xf59e0b, 0xeab308, 0x22c55e, 0x06b6d4, 0x3b82f6,
                    0x8b5cf6, 0xec4899,
                ]),
                SparkleSize::Medium,
                AnimationSpeed::Medium,
            ),
        };
        SparkleConfig {
            count,
            palette,
            size,
            speed,
            trigger: Trigger::Hover,
        }
    }
}

impl From<FloatingPreset> for FloatingConfig {
    fn from(preset: FloatingPreset) -> Self {
        use FloatingElement as E;

        let (elements, count, speed, direction) = match preset {
            FloatingPreset::Bakery => (
                vec![
                    E::colored('🍩', 28.0, 1.0, hex(0x8b5a2b)),
                    E::colored('🧁', 24.0, 1.2, hex(0xec4899)),
                    E::colored('🍪', 22.0, 0.9, hex(0x92400e)),
                    E::colored('🎂', 26.0, 0.8, hex(0x7c3aed)),
                    E::colored('✨', 18.0, 1.4, hex(0xf59e0b)),
                    E::colored('🌟', 20.0, 1.1, hex(0x10b981)),
                ],
                12,
                AnimationSpeed::Medium,
                Direction::Up,
            ),
            FloatingPreset::Magical => (
                vec![
                    E::new('✨', 20.0, 1.3),
                    E::new('🌟', 24.0, 1.0),
                    E::new('💫', 18.0, 1.5),
                    E::new('⭐', 22.0, 0.9),
                    E::new('🔮', 26.0, 0.7),
                    E::new('🪄', 28.0, 0.8),
                ],
                15,
                AnimationSpeed::Medium,
                Direction::Random,
            ),
            FloatingPreset::Celebration => (
                vec![
                    E::new('🎉', 24.0, 1.2),
                    E::new('🎊', 20.0, 1.4),
                    E::new('🎈', 26.0, 0.8),
                    E::new('🎁', 22.0, 1.1),
                    E::new('✨', 18.0, 1.6),
                    E::new('🌟', 20.0, 1.3),
                ],
                20,
                AnimationSpeed::Fast,
                Direction::Up,
            ),
            FloatingPreset::Nature => (
                vec![
                    E::colored('🌸', 22.0, 1.1, hex(0xec4899)),
                    E::colored('🦋', 24.0, 1.3, hex(0x8b5cf6)),
                    E::colored('🌺', 26.0, 0.9, hex(0xf97316)),
                    E::colored('🍃', 20.0, 1.4, hex(0x10b981)),
                    E::colored('✨', 16.0, 1.6, hex(0xf59e0b)),
                ],
                10,
                AnimationSpeed::Slow,
                Direction::Random,
            ),
        };
        FloatingConfig {
            elements,
            count,
            speed,
            direction,
        }
    }
}
