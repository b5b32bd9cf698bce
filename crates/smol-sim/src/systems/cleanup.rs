//! Cleanup system: removes destroyed, retreated and stray entities.

use smol_core::components::Destroyed;
use smol_core::enums::EntityKind;
use smol_core::events::SimEvent;
use smol_core::types::Lifetime;

use crate::world::{self, Position, World};

/// Tick lifetimes down, then despawn every entity that is marked destroyed,
/// whose lifetime ran out, or that is a projectile outside the world bounds.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<hecs::Entity>, events: &mut Vec<SimEvent>) {
    despawn_buffer.clear();
    let bounds = world.bounds();

    // Expired lifetimes (moles retreating).
    for (entity, lifetime) in world.store_mut().query_mut::<&mut Lifetime>() {
        if lifetime.tick_down() {
            despawn_buffer.push(entity);
        }
    }

    // Destroyed this tick.
    for (entity, _) in world.store_mut().query_mut::<&Destroyed>() {
        despawn_buffer.push(entity);
    }

    // Projectiles that left the playfield.
    for (entity, (kind, pos)) in world.store_mut().query_mut::<(&EntityKind, &Position)>() {
        if *kind == EntityKind::Projectile && !bounds.contains(pos.0) {
            despawn_buffer.push(entity);
        }
    }

    // An entity can be listed twice; the second despawn fails and is skipped.
    for entity in despawn_buffer.drain(..) {
        let id = world::id_of(entity);
        let kind = world.kind(id);
        if world.store_mut().despawn(entity).is_err() {
            continue;
        }
        if let Some(kind) = kind {
            log::debug!("cleaned up {kind:?} {id}");
            events.push(SimEvent::Despawned { entity: id, kind });
        }
    }
    world.retain_live();
}
