mod body;
mod enemy;
mod game_state;
mod player;
mod projectile;

// Re-export all public types
pub use body::{Body, DEFAULT_BODY_SIZE, DEFAULT_HEALTH, EntityId, Size, Vec2};
pub use enemy::Enemy;
pub use game_state::GameState;
pub use player::Player;
pub use projectile::Projectile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
}

/// Everything that lives in the world's entity table.
#[derive(Debug, Clone)]
pub enum Entity {
    Player(Player),
    Enemy(Enemy),
    Projectile(Projectile),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Player(_) => EntityKind::Player,
            Entity::Enemy(_) => EntityKind::Enemy,
            Entity::Projectile(_) => EntityKind::Projectile,
        }
    }

    pub fn body(&self) -> &Body {
        match self {
            Entity::Player(player) => &player.body,
            Entity::Enemy(enemy) => &enemy.body,
            Entity::Projectile(projectile) => &projectile.body,
        }
    }

    pub fn id(&self) -> EntityId {
        self.body().id
    }

    /// A dead player keeps its table entry until restart but no longer takes part
    /// in the simulation.
    pub fn is_active(&self) -> bool {
        match self {
            Entity::Player(player) => !player.is_dead(),
            _ => true,
        }
    }
}
