//! Engine configuration
//!
//! Loaded from a TOML file when one is provided, with compiled-in defaults
//! otherwise. Every field is optional in the file; missing sections fall
//! back to their defaults.

use crate::physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or has the wrong shape
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of one fixed simulation step in seconds
    pub fixed_timestep: f32,
    /// Cap on fixed steps per frame; `None` catches up without bound
    pub max_catchup_steps: Option<u32>,
    /// Physics world tuning
    pub physics: PhysicsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_catchup_steps: None,
            physics: PhysicsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Load a configuration file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                log::warn!(
                    "could not load config from {}, using defaults: {err}",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_relative_eq!(config.fixed_timestep, 1.0 / 60.0);
        assert_eq!(config.max_catchup_steps, None);
        assert_relative_eq!(config.physics.gravity.y, -9.81);
    }

    #[test]
    fn test_partial_file_keeps_default_sections() {
        let config: EngineConfig = toml::from_str("fixed_timestep = 0.02").unwrap();
        assert_relative_eq!(config.fixed_timestep, 0.02);
        assert_relative_eq!(config.physics.gravity.y, -9.81);
    }

    #[test]
    fn test_gravity_override() {
        let config: EngineConfig = toml::from_str(
            "[physics]\ngravity = [0.0, -1.62, 0.0]",
        )
        .unwrap();
        assert_relative_eq!(config.physics.gravity.y, -1.62);
    }
}
