//! Gameplay tuning for the shooter.
//!
//! Keep this separate from runtime configuration (update rate, logging, key hold).

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Movement speed in canvas pixels per second, per axis.
    pub speed: f32,

    /// Spawn distance from the bottom edge of the canvas.
    pub spawn_offset_y: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 250.0,
            spawn_offset_y: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EnemyTuning {
    /// Downward speed in pixels per second.
    pub fall_speed: f32,

    /// Vertical spawn position; negative is above the canvas.
    pub spawn_y: f32,

    /// Health taken from the player on contact.
    pub contact_damage: i32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            fall_speed: 270.0,
            spawn_y: -100.0,
            contact_damage: 25,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Upward speed in pixels per second.
    pub speed: f32,

    /// How far above the player's position a projectile appears.
    pub muzzle_offset: f32,

    /// Minimum time between two shots.
    pub cooldown: Duration,

    /// Cooldown a fresh spawner starts with, so the first shot is immediate.
    pub initial_cooldown: Duration,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 350.0,
            muzzle_offset: 14.0,
            cooldown: Duration::from_millis(500),
            initial_cooldown: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WaveTuning {
    /// Time between enemy waves.
    pub interval: Duration,

    /// Enemies per wave.
    pub size: usize,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            size: 4,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreTuning {
    /// Points per enemy destroyed; one more point is earned per second alive.
    pub points_per_hit: u64,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self { points_per_hit: 30 }
    }
}

/// All gameplay tuning in one place.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub projectile: ProjectileTuning,
    pub wave: WaveTuning,
    pub score: ScoreTuning,
}
