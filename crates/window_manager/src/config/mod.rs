//! Configuration system
//!
//! Window manager settings can be kept in a `.toml` or `.ron` file next to the
//! game's other settings and loaded through the [`Config`] trait.

pub use serde::{Deserialize, Serialize};

use std::path::Path;

/// On-disk formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format matching the extension of `path`
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Settings that can be stored next to the game's other settings files
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Check loaded values; the default accepts everything
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Load and validate settings from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Save settings to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of range
    #[error("Invalid setting {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Window manager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowManagerConfig {
    /// Factor applied to the frame delta while a close animation is pending
    pub time_scale: f32,

    /// Destroy windows that stay instantiated but hidden for too long
    pub idle_eviction: bool,

    /// Seconds a hidden window survives before idle eviction
    pub idle_timeout: f32,

    /// Layer used when opening with default options
    pub default_layer: i32,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            idle_eviction: false,
            idle_timeout: 60.0,
            default_layer: 0,
        }
    }
}

impl Config for WindowManagerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.time_scale.is_nan() || self.time_scale < 0.0 {
            return Err(ConfigError::Invalid {
                field: "time_scale",
                reason: "must be zero or positive",
            });
        }
        if self.idle_timeout.is_nan() || self.idle_timeout <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "idle_timeout",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(file_name: &str) -> String {
        std::env::temp_dir()
            .join(format!("window_manager_{}_{}", std::process::id(), file_name))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_default_config() {
        let config = WindowManagerConfig::default();
        assert_eq!(config.time_scale, 1.0);
        assert!(!config.idle_eviction);
        assert_eq!(config.idle_timeout, 60.0);
        assert_eq!(config.default_layer, 0);
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("config.toml");
        let config = WindowManagerConfig {
            time_scale: 0.5,
            idle_eviction: true,
            idle_timeout: 30.0,
            default_layer: 2,
        };

        config.save_to_file(&path).unwrap();
        let loaded = WindowManagerConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let path = temp_path("partial.ron");
        std::fs::write(&path, "(idle_eviction: true)").unwrap();

        let loaded = WindowManagerConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(loaded.idle_eviction);
        assert_eq!(loaded.idle_timeout, 60.0);
        assert_eq!(loaded.time_scale, 1.0);
    }

    #[test]
    fn test_unsupported_format() {
        let result = WindowManagerConfig::load_from_file("settings.ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        let config = WindowManagerConfig::default();
        let result = config.save_to_file("settings");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let path = temp_path("invalid.toml");
        std::fs::write(&path, "time_scale = -2.0\n").unwrap();

        let result = WindowManagerConfig::load_from_file(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::Invalid { field: "time_scale", .. })));
    }
}
