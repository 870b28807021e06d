//! Physics and gameplay tuning
//!
//! Every constant the simulation reads lives here and is passed into
//! [`crate::sim::Level::new`], so independent levels can run with different
//! values. Tuning files are JSON; missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading configuration or level-set files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Simulation tunables (units are cells and seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Longest substep the integrator will take
    pub max_step: f32,

    // === Player ===
    /// Horizontal speed while left or right is held
    pub player_x_speed: f32,
    /// Downward acceleration
    pub gravity: f32,
    /// Upward speed applied on jump
    pub jump_speed: f32,

    // === Coins ===
    /// Phase advance per second
    pub wobble_speed: f32,
    /// Vertical wobble amplitude
    pub wobble_dist: f32,

    // === Enemies ===
    /// Patrol speed
    pub enemy_speed: f32,
    /// Projectile speed
    pub arrow_speed: f32,
    /// Seconds between shots while the player stays in sight
    pub fire_cooldown: f32,

    // === Level flow ===
    /// Grace period between a terminal status and the level finishing
    pub finish_delay: f32,
    /// Frame delta clamp applied by the runner
    pub max_frame_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_step: 0.05,

            player_x_speed: 7.0,
            gravity: 30.0,
            jump_speed: 17.0,

            wobble_speed: 8.0,
            wobble_dist: 0.07,

            enemy_speed: 1.0,
            arrow_speed: 3.0,
            fire_cooldown: 2.0,

            finish_delay: 1.0,
            max_frame_step: 0.1,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Using default tuning: {}", e);
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 12.5 }"#).unwrap();
        assert_eq!(tuning.gravity, 12.5);
        assert_eq!(tuning.jump_speed, 17.0);
        assert_eq!(tuning.max_step, 0.05);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = Tuning::from_json("{ gravity: }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let tuning = Tuning {
            player_x_speed: 9.0,
            fire_cooldown: 0.5,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/definitely/not/here/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }
}
