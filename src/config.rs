use std::time::Duration;

use crate::entities::Size;
use crate::tuning::Tuning;

// Runtime constants (not gameplay tuning).

pub const DEFAULT_CANVAS_WIDTH: f32 = 300.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 500.0;
pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_KEY_HOLD: Duration = Duration::from_millis(300);
pub const DEFAULT_LOG_FILE: &str = "space_shooter.log";

/// Everything the world and the app need to know before the first frame.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Logical canvas size in pixels.
    pub canvas: Size,
    /// Simulation steps per second.
    pub update_rate: u32,
    /// Seed for enemy placement.
    pub seed: u64,
    /// Draw every body's velocity vector.
    pub show_velocity: bool,
    /// How long a key counts as held when the terminal never reports releases.
    pub key_hold: Duration,
    pub tuning: Tuning,
}

impl GameConfig {
    /// Length of one fixed simulation step.
    pub fn step(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.update_rate.max(1)))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas: Size::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            update_rate: DEFAULT_FPS,
            seed: 0,
            show_velocity: false,
            key_hold: DEFAULT_KEY_HOLD,
            tuning: Tuning::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_step_is_one_sixtieth() {
        let config = GameConfig::default();
        assert_eq!(config.step(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn test_zero_update_rate_does_not_divide_by_zero() {
        let config = GameConfig {
            update_rate: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.step(), Duration::from_secs(1));
    }
}
