//! Collision detection: which live entities overlap a given hit box.
//!
//! Detection is separated from resolution. A `BroadPhase` only reports
//! contacts; the physics component of the scanning entity decides what they
//! mean.

use smol_core::enums::EntityKind;
use smol_core::hitbox::HitBox;
use smol_core::types::EntityId;

use crate::world::World;

/// What a collision policy may know about the entity it touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: EntityId,
    pub kind: EntityKind,
    pub rigid: bool,
    pub has_health: bool,
    /// Copy of the other entity's hit box at scan time.
    pub hit_box: HitBox,
}

/// Candidate search for collision scans.
pub trait BroadPhase: Send + Sync {
    /// Every live entity other than `subject` whose hit box overlaps
    /// `hit_box`, in world order. Entities marked destroyed are skipped.
    fn contacts(&self, world: &World, subject: EntityId, hit_box: &HitBox) -> Vec<Contact>;
}

/// Tests every pair. O(n²) per tick, which is fine for a screenful of
/// entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl BroadPhase for BruteForce {
    fn contacts(&self, world: &World, subject: EntityId, hit_box: &HitBox) -> Vec<Contact> {
        world
            .entities()
            .filter(|&id| id != subject && !world.is_destroyed(id))
            .filter(|&id| {
                world
                    .physics(id)
                    .is_some_and(|other| hit_box.is_colliding(other.hit_box()))
            })
            .filter_map(|id| world.contact(id))
            .collect()
    }
}
