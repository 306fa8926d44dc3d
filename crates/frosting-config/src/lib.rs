//! Configuration file handling.
//!
//! The file is TOML with one table per effect. Every key is optional; a
//! missing file is the same as an empty one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use frosting_core::{
    AnimationSpeed, BackgroundVariant, Direction, FloatingPreset, Intensity, MagicalVariant,
    Palette, SparklePreset, SparkleSize, Trigger,
};
use frosting_effects::{
    BackgroundConfig, EffectConfig, FloatingConfig, MagicalConfig, SparkleConfig,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("no home directory to place the config file in")]
    NoConfigDir,
    #[error("{0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for every effect. Random when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Frames per second of the terminal loop.
    pub frame_rate: u32,
    pub background: BackgroundSection,
    pub sparkles: SparkleSection,
    pub floating: FloatingSection,
    pub magical: MagicalSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            frame_rate: 60,
            background: BackgroundSection::default(),
            sparkles: SparkleSection::default(),
            floating: FloatingSection::default(),
            magical: MagicalSection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSection {
    pub variant: BackgroundVariant,
    pub speed: AnimationSpeed,
    pub colors: Vec<String>,
}

impl Default for BackgroundSection {
    fn default() -> Self {
        Self {
            variant: BackgroundVariant::Waves,
            speed: AnimationSpeed::Medium,
            colors: Palette::background().to_hex(),
        }
    }
}

/// Sparkle settings. A preset fills in every key left unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkleSection {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<SparklePreset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<SparkleSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<AnimationSpeed>,
    pub trigger: Trigger,
}

impl Default for SparkleSection {
    fn default() -> Self {
        Self {
            enabled: true,
            preset: None,
            count: None,
            colors: None,
            size: None,
            speed: None,
            trigger: Trigger::Hover,
        }
    }
}

impl SparkleSection {
    pub fn to_config(&self) -> SparkleConfig {
        let base = self.preset.map(SparkleConfig::from).unwrap_or_default();
        SparkleConfig {
            count: self.count.unwrap_or(base.count),
            palette: match &self.colors {
                Some(colors) => Palette::from_hex_lossy(colors, Palette::sparkle()),
                None => base.palette,
            },
            size: self.size.unwrap_or(base.size),
            speed: self.speed.unwrap_or(base.speed),
            trigger: self.trigger,
        }
    }
}

/// Floating element settings. A preset supplies the element set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingSection {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<FloatingPreset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<AnimationSpeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Default for FloatingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            preset: Some(FloatingPreset::Bakery),
            count: None,
            speed: None,
            direction: None,
        }
    }
}

impl FloatingSection {
    pub fn to_config(&self) -> FloatingConfig {
        let base = self.preset.map(FloatingConfig::from).unwrap_or_default();
        FloatingConfig {
            count: self.count.unwrap_or(base.count),
            speed: self.speed.unwrap_or(base.speed),
            direction: self.direction.unwrap_or(base.direction),
            elements: base.elements,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicalSection {
    pub enabled: bool,
    pub variant: MagicalVariant,
    pub intensity: Intensity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl Default for MagicalSection {
    fn default() -> Self {
        Self {
            enabled: false,
            variant: MagicalVariant::Sparkles,
            intensity: Intensity::Medium,
            colors: None,
        }
    }
}

impl MagicalSection {
    pub fn to_config(&self) -> MagicalConfig {
        let palette = match &self.colors {
            Some(colors) => Palette::from_hex_lossy(colors, Palette::sparkle()),
            None => Palette::sparkle(),
        };
        MagicalConfig {
            variant: self.variant,
            intensity: self.intensity,
            palette,
        }
    }
}

impl Config {
    /// Default location of the config file, under the platform config directory.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "frosting")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Parse configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load `path` if given, otherwise the default file if it exists, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load(&path),
            Ok(_) => Ok(Self::default()),
            Err(err) => {
                tracing::warn!(%err, "using default config");
                Ok(Self::default())
            }
        }
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(io_err)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::Validation(
                "frame_rate must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn background_effect(&self) -> EffectConfig {
        let section = &self.background;
        EffectConfig::Background(BackgroundConfig {
            variant: section.variant,
            speed: section.speed,
            palette: Palette::from_hex_lossy(&section.colors, Palette::background()),
        })
    }

    pub fn sparkle_effect(&self) -> Option<EffectConfig> {
        self.sparkles
            .enabled
            .then(|| EffectConfig::Sparkles(self.sparkles.to_config()))
    }

    pub fn floating_effect(&self) -> Option<EffectConfig> {
        self.floating
            .enabled
            .then(|| EffectConfig::Floating(self.floating.to_config()))
    }

    pub fn magical_effect(&self) -> Option<EffectConfig> {
        self.magical
            .enabled
            .then(|| EffectConfig::Magical(self.magical.to_config()))
    }
}

#[cfg(test)]
mod tests {
    use frosting_core::Rgba;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            seed = 7

            [background]
            variant = "bubbles"

            [sparkles]
            trigger = "click"
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.background.variant, BackgroundVariant::Bubbles);
        assert_eq!(config.background.speed, AnimationSpeed::Medium);
        assert_eq!(config.background.colors.len(), 5);
        assert_eq!(config.sparkles.trigger, Trigger::Click);
        assert!(!config.magical.enabled);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut config = Config::default();
        config.seed = Some(99);
        config.background.variant = BackgroundVariant::Organic;
        config.sparkles.preset = Some(SparklePreset::Rainbow);
        config.floating.direction = Some(Direction::Random);
        config.magical.enabled = true;
        config.magical.variant = MagicalVariant::Aurora;

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        match Config::load(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}"),
        }
        assert!(matches!(
            Config::load_or_default(Some(path.as_path())),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::parse("[background]\nvariant = \"stripes\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::parse("frame_rate = 0"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_sparkle_preset_with_overrides() {
        let section = SparkleSection {
            preset: Some(SparklePreset::Celebration),
            count: Some(4),
            ..SparkleSection::default()
        };
        let config = section.to_config();
        assert_eq!(config.count, 4);
        assert_eq!(config.size, SparkleSize::Large);
        assert_eq!(config.speed, AnimationSpeed::Fast);
        assert_eq!(config.palette.len(), 5);
        assert_eq!(config.trigger, Trigger::Hover);
    }

    #[test]
    fn test_floating_preset_with_overrides() {
        let section = FloatingSection {
            preset: Some(FloatingPreset::Nature),
            direction: Some(Direction::Down),
            ..FloatingSection::default()
        };
        let config = section.to_config();
        assert_eq!(config.count, 10);
        assert_eq!(config.direction, Direction::Down);
        assert_eq!(config.elements[0].glyph, '🌸');

        let plain = FloatingSection {
            preset: None,
            ..FloatingSection::default()
        };
        assert_eq!(plain.to_config(), FloatingConfig::default());
    }

    #[test]
    fn test_bad_colors_skipped_or_defaulted() {
        let mut config = Config::default();
        config.background.colors = vec!["#ff0000".into(), "red".into(), "#00f".into()];
        let EffectConfig::Background(background) = config.background_effect() else {
            panic!("expected background effect");
        };
        assert_eq!(
            background.palette.colors(),
            &[Rgba::rgb(255, 0, 0), Rgba::rgb(0, 0, 255)]
        );

        config.background.colors = vec!["nope".into()];
        let EffectConfig::Background(background) = config.background_effect() else {
            panic!("expected background effect");
        };
        assert_eq!(background.palette, Palette::background());
    }

    #[test]
    fn test_disabled_sections_build_nothing() {
        let mut config = Config::default();
        assert!(config.sparkle_effect().is_some());
        assert!(config.magical_effect().is_none());
        config.sparkles.enabled = false;
        config.magical.enabled = true;
        assert!(config.sparkle_effect().is_none());
        assert!(matches!(
            config.magical_effect(),
            Some(EffectConfig::Magical(_))
        ));
    }
}
