use super::body::{Body, EntityId, Size, Vec2};
use crate::tuning::ProjectileTuning;

/// Highest point above the canvas a body may be clamped to.
const TOP_MARGIN: f32 = -100.0;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
}

impl Projectile {
    /// Spawns a projectile just above `muzzle`.
    pub fn fire(id: EntityId, muzzle: Vec2, tuning: &ProjectileTuning) -> Self {
        Self {
            body: Body::new(id, Vec2::new(muzzle.x, muzzle.y - tuning.muzzle_offset)),
        }
    }

    /// Flies upward. Returns `false` once the projectile has left through the top.
    pub fn update(&mut self, delta_secs: f32, canvas: Size, tuning: &ProjectileTuning) -> bool {
        self.body.velocity = Vec2::new(0.0, -tuning.speed);
        self.body.integrate(delta_secs);
        self.body.clamp(0.0, canvas.width, TOP_MARGIN, canvas.height);

        self.body.position.y > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Size = Size::new(300.0, 500.0);

    #[test]
    fn test_projectile_spawns_above_muzzle() {
        let projectile = Projectile::fire(
            EntityId(7),
            Vec2::new(150.0, 400.0),
            &ProjectileTuning::default(),
        );
        assert_eq!(projectile.body.position, Vec2::new(150.0, 386.0));
        assert_eq!(projectile.body.id, EntityId(7));
    }

    #[test]
    fn test_projectile_moves_up() {
        let mut projectile = Projectile::fire(
            EntityId(7),
            Vec2::new(150.0, 400.0),
            &ProjectileTuning::default(),
        );
        let on_screen = projectile.update(0.5, CANVAS, &ProjectileTuning::default());
        assert!(on_screen);
        assert_eq!(projectile.body.velocity, Vec2::new(0.0, -350.0));
        assert_eq!(projectile.body.position.y, 211.0);
    }

    #[test]
    fn test_projectile_leaves_through_top() {
        let mut projectile =
            Projectile::fire(EntityId(7), Vec2::new(150.0, 20.0), &ProjectileTuning::default());
        let on_screen = projectile.update(0.5, CANVAS, &ProjectileTuning::default());
        assert!(!on_screen);
        assert_eq!(projectile.body.position.y, -100.0);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_projectile_only_moves_up(
                x in 0.0f32..300.0,
                y in 15.0f32..500.0,
                delta in 0.001f32..0.1
            ) {
                let mut projectile =
                    Projectile::fire(EntityId(0), Vec2::new(x, y), &ProjectileTuning::default());
                let before = projectile.body.position;
                projectile.update(delta, CANVAS, &ProjectileTuning::default());
                prop_assert!(projectile.body.position.y < before.y);
                prop_assert_eq!(projectile.body.position.x, before.x);
            }
        }
    }
}
