use super::body::{Body, EntityId, Size, Vec2};
use crate::input::Controller;
use crate::tuning::PlayerTuning;

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// Written by the input handler once per step.
    pub controller: Controller,
}

impl Player {
    /// Creates a player at the standard spawn point near the bottom of the canvas.
    pub fn spawn(id: EntityId, canvas: Size, tuning: &PlayerTuning) -> Self {
        let position = Vec2::new(canvas.width / 2.0, canvas.height - tuning.spawn_offset_y);
        Self {
            body: Body::new(id, position),
            controller: Controller::default(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.body.is_dead()
    }

    /// Steers from the controller, moves, and keeps the ship on the canvas.
    pub fn update(&mut self, delta_secs: f32, canvas: Size, tuning: &PlayerTuning) {
        self.body.velocity = Vec2::new(
            self.controller.move_x.signum() as f32 * tuning.speed,
            self.controller.move_y.signum() as f32 * tuning.speed,
        );

        self.body.integrate(delta_secs);
        self.body.clamp(0.0, canvas.width, 0.0, canvas.height);
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.body.take_damage(damage);
    }
}
