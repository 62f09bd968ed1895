//! Timer-accumulator spawners. They only decide *when* and *how many*; the
//! world allocates ids and builds the entities.

use std::time::Duration;

use crate::tuning::{ProjectileTuning, WaveTuning};

/// Emits a wave of enemies every `interval` of simulated time.
#[derive(Debug, Clone, Default)]
pub struct EnemySpawner {
    accumulated: Duration,
}

impl EnemySpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many enemies to spawn this step: a full wave or nothing.
    /// At most one wave per step; leftover time waits for the next one.
    pub fn update(&mut self, delta: Duration, tuning: &WaveTuning) -> usize {
        self.accumulated += delta;
        if self.accumulated >= tuning.interval {
            self.accumulated -= tuning.interval;
            tuning.size
        } else {
            0
        }
    }
}

/// Lets the player fire while the action button is held, at most once per cooldown.
#[derive(Debug, Clone)]
pub struct ProjectileSpawner {
    cooldown: Duration,
}

impl ProjectileSpawner {
    pub fn new(tuning: &ProjectileTuning) -> Self {
        Self {
            cooldown: tuning.initial_cooldown,
        }
    }

    /// Time since the last shot.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Returns `true` when a projectile should be fired this step.
    pub fn update(&mut self, delta: Duration, firing: bool, tuning: &ProjectileTuning) -> bool {
        self.cooldown += delta;
        if firing && self.cooldown >= tuning.cooldown {
            self.cooldown = Duration::ZERO;
            true
        } else {
            false
        }
    }
}
