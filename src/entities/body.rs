use std::fmt;

use crate::collision::aabb_overlap;

/// Identity of an entity in the world's table. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn half(&self) -> Size {
        Size::new(self.width / 2.0, self.height / 2.0)
    }
}

pub const DEFAULT_BODY_SIZE: Size = Size::new(10.0, 10.0);
pub const DEFAULT_HEALTH: i32 = 100;

/// The physical part shared by every entity: where it is, where it is going,
/// how big it is and how much damage it can still take.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Size,
    pub health: i32,
}

impl Body {
    pub fn new(id: EntityId, position: Vec2) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::default(),
            size: DEFAULT_BODY_SIZE,
            health: DEFAULT_HEALTH,
        }
    }

    pub fn half_size(&self) -> Size {
        self.size.half()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Moves the body along its velocity for `delta_secs` seconds.
    pub fn integrate(&mut self, delta_secs: f32) {
        self.position.x += delta_secs * self.velocity.x;
        self.position.y += delta_secs * self.velocity.y;
    }

    /// Keeps the position inside `[min_x, max_x] x [min_y, max_y]`.
    pub fn clamp(&mut self, min_x: f32, max_x: f32, min_y: f32, max_y: f32) {
        self.position.x = self.position.x.clamp(min_x, max_x);
        self.position.y = self.position.y.clamp(min_y, max_y);
    }

    /// Bodies are boxes anchored at their position; touching edges do not count.
    pub fn overlaps(&self, other: &Body) -> bool {
        aabb_overlap(self.position, self.size, other.position, other.size)
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.health -= damage;
    }
}
