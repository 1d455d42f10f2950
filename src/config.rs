//! Immutable per-actor tunables.
//!
//! Loaded once at startup (defaults or a JSON file) and handed to states by
//! shared reference. Nothing here is mutated after [`GameConfig::load`].

use std::path::{Path, PathBuf};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` duration in seconds.
///
/// An inverted range (`min > max`) is a configuration mistake; it samples as
/// `min` every time instead of failing mid-game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: f32,
    pub max: f32,
}

impl TimeRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// Sensor placement relative to the actor's position.
///
/// `x` components are mirrored by facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub ground_check: Vec2,
    pub ground_check_radius: f32,
    pub wall_check: Vec2,
    pub wall_check_distance: f32,
    /// Above `wall_check`; open air here while the wall sensor hits means a ledge.
    pub ledge_check: Vec2,
    /// Covers the head room a crouched actor needs to stand up.
    pub ceiling_check: Vec2,
    pub ceiling_check_radius: f32,
    /// Downward sensor ahead of the feet (patrol edge detection).
    pub floor_ahead_check: Vec2,
    pub floor_ahead_distance: f32,
    /// Origin of horizontal target sensors.
    pub eye: Vec2,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            ground_check: Vec2::new(0.0, -0.8),
            ground_check_radius: 0.1,
            wall_check: Vec2::new(0.0, 0.2),
            wall_check_distance: 0.4,
            ledge_check: Vec2::new(0.0, 0.8),
            ceiling_check: Vec2::new(0.0, 0.55),
            ceiling_check_radius: 0.25,
            floor_ahead_check: Vec2::new(0.45, -0.8),
            floor_ahead_distance: 0.4,
            eye: Vec2::new(0.0, 0.3),
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub movement_velocity: f32,

    pub jump_velocity: f32,
    pub amount_of_jumps: u32,
    pub coyote_time: f32,
    pub variable_jump_height_multiplier: f32,
    /// How long a jump press stays buffered.
    pub jump_input_hold_time: f32,

    pub wall_slide_velocity: f32,
    pub wall_climb_velocity: f32,
    pub wall_jump_velocity: f32,
    pub wall_jump_time: f32,
    pub wall_jump_angle: Vec2,

    /// Hanging position relative to the ledge corner.
    pub start_offset: Vec2,
    /// Standing position on top of the ledge relative to the corner.
    pub stop_offset: Vec2,

    pub dash_cooldown: f32,
    pub dash_time: f32,
    pub dash_velocity: f32,
    pub dash_end_y_multiplier: f32,

    pub crouch_movement_velocity: f32,
    pub crouch_collider_height: f32,
    pub stand_collider_height: f32,
    pub collider_width: f32,

    pub sensors: SensorConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            movement_velocity: 10.0,
            jump_velocity: 15.0,
            amount_of_jumps: 1,
            coyote_time: 0.2,
            variable_jump_height_multiplier: 0.5,
            jump_input_hold_time: 0.2,
            wall_slide_velocity: 3.0,
            wall_climb_velocity: 3.0,
            wall_jump_velocity: 20.0,
            wall_jump_time: 0.4,
            wall_jump_angle: Vec2::new(1.0, 2.0),
            start_offset: Vec2::new(0.35, 0.6),
            stop_offset: Vec2::new(0.5, 0.81),
            dash_cooldown: 0.5,
            dash_time: 0.2,
            dash_velocity: 30.0,
            dash_end_y_multiplier: 0.2,
            crouch_movement_velocity: 5.0,
            crouch_collider_height: 0.8,
            stand_collider_height: 1.6,
            collider_width: 0.6,
            sensors: SensorConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Enemy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub idle_time: TimeRange,
    pub patrol_time: TimeRange,
    pub movement_speed: f32,

    pub min_aggro_distance: f32,
    pub max_aggro_distance: f32,
    pub close_range_action_distance: f32,

    pub long_range_action_time: f32,
    pub charge_speed: f32,
    pub charge_time: f32,

    pub amount_of_turns: u32,
    pub time_between_turns: f32,

    pub attack_cooldown: f32,

    pub collider_size: Vec2,
    pub sensors: SensorConfig,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            idle_time: TimeRange::new(1.0, 2.0),
            patrol_time: TimeRange::new(2.0, 4.0),
            movement_speed: 3.0,
            min_aggro_distance: 3.0,
            max_aggro_distance: 4.0,
            close_range_action_distance: 1.0,
            long_range_action_time: 1.5,
            charge_speed: 6.0,
            charge_time: 2.0,
            amount_of_turns: 2,
            time_between_turns: 0.75,
            attack_cooldown: 1.0,
            collider_size: Vec2::new(0.9, 1.6),
            // Wider body than the player: sensors start past its half-width.
            sensors: SensorConfig {
                wall_check_distance: 0.6,
                floor_ahead_check: Vec2::new(0.55, -0.8),
                ..SensorConfig::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject magnitudes that cannot be meaningful; warn about inverted
    /// ranges, which are tolerated and clamped when sampled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.player;
        let e = &self.enemy;
        let magnitudes = [
            ("player.movement_velocity", p.movement_velocity),
            ("player.jump_velocity", p.jump_velocity),
            ("player.coyote_time", p.coyote_time),
            ("player.jump_input_hold_time", p.jump_input_hold_time),
            ("player.wall_slide_velocity", p.wall_slide_velocity),
            ("player.wall_climb_velocity", p.wall_climb_velocity),
            ("player.wall_jump_time", p.wall_jump_time),
            ("player.dash_cooldown", p.dash_cooldown),
            ("player.dash_time", p.dash_time),
            ("player.crouch_collider_height", p.crouch_collider_height),
            ("player.stand_collider_height", p.stand_collider_height),
            ("enemy.movement_speed", e.movement_speed),
            ("enemy.min_aggro_distance", e.min_aggro_distance),
            ("enemy.max_aggro_distance", e.max_aggro_distance),
            ("enemy.close_range_action_distance", e.close_range_action_distance),
            ("enemy.long_range_action_time", e.long_range_action_time),
            ("enemy.charge_time", e.charge_time),
            ("enemy.time_between_turns", e.time_between_turns),
            ("enemy.attack_cooldown", e.attack_cooldown),
        ];
        for (field, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a finite non-negative number, got {value}"),
                });
            }
        }

        if p.crouch_collider_height > p.stand_collider_height {
            return Err(ConfigError::Invalid {
                field: "player.crouch_collider_height",
                reason: "taller than stand_collider_height".to_string(),
            });
        }

        for (field, range) in [("enemy.idle_time", e.idle_time), ("enemy.patrol_time", e.patrol_time)] {
            if ![range.min, range.max].iter().all(|v| v.is_finite() && *v >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected finite non-negative bounds, got {range:?}"),
                });
            }
            if range.is_inverted() {
                tracing::warn!(
                    field,
                    min = range.min,
                    max = range.max,
                    "inverted range, sampling will clamp to min"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fixed_range_always_samples_its_value() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = TimeRange::fixed(1.25);
        for _ in 0..32 {
            assert_eq!(range.sample(&mut rng), 1.25);
        }
    }

    #[test]
    fn inverted_range_clamps_to_min() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = TimeRange::new(3.0, 1.0);
        assert!(range.is_inverted());
        assert_eq!(range.sample(&mut rng), 3.0);
        assert_eq!(range.sample(&mut rng), 3.0);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = GameConfig::from_json(
            r#"{ "enemy": { "idle_time": { "min": 0.5, "max": 0.5 } }, "player": { "jump_velocity": 12.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.enemy.idle_time, TimeRange::fixed(0.5));
        assert_eq!(config.player.jump_velocity, 12.0);
        assert_eq!(config.player.movement_velocity, PlayerConfig::default().movement_velocity);
    }

    #[test]
    fn inverted_range_is_accepted_by_validation() {
        let config = GameConfig::from_json(r#"{ "enemy": { "idle_time": { "min": 2.0, "max": 1.0 } } }"#);
        assert!(config.is_ok());
    }

    #[test]
    fn negative_magnitude_is_rejected() {
        let err = GameConfig::from_json(r#"{ "player": { "dash_time": -0.1 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "player.dash_time",
                ..
            }
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
