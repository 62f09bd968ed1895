//! Pairwise axis-aligned bounding box collision.

use std::collections::BTreeMap;

use crate::entities::{Entity, EntityId, EntityKind, Size, Vec2};

/// Strict AABB test: boxes that only share an edge do not overlap.
pub fn aabb_overlap(a_pos: Vec2, a_size: Size, b_pos: Vec2, b_size: Size) -> bool {
    a_pos.x < b_pos.x + b_size.width
        && a_pos.x + a_size.width > b_pos.x
        && a_pos.y < b_pos.y + b_size.height
        && a_pos.y + a_size.height > b_pos.y
}

/// A projectile touching something it can destroy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile: EntityId,
    pub target: EntityId,
}

/// Tests every ordered pair of active entities, in table order.
///
/// Each pair whose first member is a projectile and whose second is anything but
/// the player yields one hit, so two overlapping projectiles hit each other twice.
pub fn find_hits(entities: &BTreeMap<EntityId, Entity>) -> Vec<Hit> {
    let mut hits = Vec::new();

    for (&id_a, a) in entities.iter().filter(|(_, e)| e.is_active()) {
        if a.kind() != EntityKind::Projectile {
            continue;
        }

        for (&id_b, b) in entities.iter().filter(|(_, e)| e.is_active()) {
            if id_a == id_b || b.kind() == EntityKind::Player {
                continue;
            }

            if a.body().overlaps(b.body()) {
                hits.push(Hit {
                    projectile: id_a,
                    target: id_b,
                });
            }
        }
    }

    hits
}
