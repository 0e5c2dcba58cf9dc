//! Game tunables.
//!
//! Defaults reproduce the shipped browser game. A JSON file may override any
//! subset of fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;
pub const DEFAULT_LIVES: u32 = 5;
/// Expected enemy spawns per millisecond at intensity 1.0.
pub const DEFAULT_BASE_SPAWN_RATE: f64 = 0.002;
pub const DEFAULT_INTENSITY_STEP: f64 = 0.1;
pub const DEFAULT_MAX_INTENSITY: f64 = 1.5;
pub const DEFAULT_MILESTONES: [u32; 6] = [1000, 2500, 5000, 10000, 20000, 50000];
pub const DEFAULT_MAX_BULLETS: usize = 5;
pub const DEFAULT_INVINCIBILITY_MS: f64 = 3000.0;
/// One 60 Hz frame.
pub const DEFAULT_MAX_FRAME_MS: f64 = 16.67;
pub const DEFAULT_POOL_PREWARM: usize = 50;
pub const DEFAULT_POINTS_PER_KILL: u32 = 100;
pub const DEFAULT_EXPLOSION_PARTICLES: usize = 8;
/// Score at which enemies start entering from all four edges.
pub const DEFAULT_FOUR_SIDED_SCORE: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Lives used when the session collaborator does not say otherwise.
    pub default_lives: u32,
    pub base_spawn_rate: f64,
    pub intensity_step: f64,
    pub max_intensity: f64,
    pub milestones: Vec<u32>,
    pub max_bullets: usize,
    pub invincibility_ms: f64,
    pub max_frame_ms: f64,
    pub pool_prewarm: usize,
    pub points_per_kill: u32,
    pub explosion_particles: usize,
    pub four_sided_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            default_lives: DEFAULT_LIVES,
            base_spawn_rate: DEFAULT_BASE_SPAWN_RATE,
            intensity_step: DEFAULT_INTENSITY_STEP,
            max_intensity: DEFAULT_MAX_INTENSITY,
            milestones: DEFAULT_MILESTONES.to_vec(),
            max_bullets: DEFAULT_MAX_BULLETS,
            invincibility_ms: DEFAULT_INVINCIBILITY_MS,
            max_frame_ms: DEFAULT_MAX_FRAME_MS,
            pool_prewarm: DEFAULT_POOL_PREWARM,
            points_per_kill: DEFAULT_POINTS_PER_KILL,
            explosion_particles: DEFAULT_EXPLOSION_PARTICLES,
            four_sided_score: DEFAULT_FOUR_SIDED_SCORE,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.max_intensity < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "max_intensity must be at least 1.0, got {}",
                self.max_intensity
            )));
        }
        if self.intensity_step < 0.0 {
            return Err(ConfigError::Invalid("intensity_step must not be negative".into()));
        }
        if self.milestones.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::Invalid("milestones must be strictly increasing".into()));
        }
        if self.max_bullets == 0 {
            return Err(ConfigError::Invalid("max_bullets must be at least 1".into()));
        }
        if self.base_spawn_rate < 0.0 || self.invincibility_ms < 0.0 {
            return Err(ConfigError::Invalid(
                "spawn rate and invincibility window must not be negative".into(),
            ));
        }
        if self.max_frame_ms <= 0.0 {
            return Err(ConfigError::Invalid("max_frame_ms must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{ "max_bullets": 3 }"#).unwrap();
        assert_eq!(config.max_bullets, 3);
        assert_eq!(config.default_lives, DEFAULT_LIVES);
        assert_eq!(config.milestones, DEFAULT_MILESTONES.to_vec());
    }

    #[test]
    fn rejects_unsorted_milestones() {
        let config = GameConfig {
            milestones: vec![2500, 1000],
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_cap_below_one() {
        let config = GameConfig {
            max_intensity: 0.5,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
