use super::body::{Body, EntityId, Size, Vec2};
use crate::tuning::EnemyTuning;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
}

impl Enemy {
    pub fn new(id: EntityId, x: f32, tuning: &EnemyTuning) -> Self {
        Self {
            body: Body::new(id, Vec2::new(x, tuning.spawn_y)),
        }
    }

    /// Falls at a fixed speed and clamps to the canvas (with room above it).
    /// Returns `false` once the enemy has reached the bottom edge.
    pub fn update(&mut self, delta_secs: f32, canvas: Size, tuning: &EnemyTuning) -> bool {
        self.body.velocity = Vec2::new(0.0, tuning.fall_speed);
        self.body.integrate(delta_secs);
        self.body
            .clamp(0.0, canvas.width, tuning.spawn_y.min(0.0), canvas.height);

        self.body.position.y < canvas.height
    }
}
