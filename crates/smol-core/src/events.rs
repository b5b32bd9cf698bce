//! Events emitted by the simulation during a tick, for views and logs.

use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;
use crate::types::{EntityId, Point};

/// Something that happened during the last tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// An entity entered the world.
    Spawned {
        entity: EntityId,
        kind: EntityKind,
        position: Point,
    },
    /// An entity left the world (destroyed, retreated or despawned).
    Despawned { entity: EntityId, kind: EntityKind },
    /// A rigid contact resolved by `source`'s collision policy.
    Collision { source: EntityId, other: EntityId },
    /// Health was removed from `target`.
    Damaged {
        target: EntityId,
        amount: u32,
        remaining: u32,
    },
    /// A mole was smashed by the weapon.
    EnemySmashed { enemy: EntityId, by: EntityId },
    /// A health-bearing entity died.
    Died { entity: EntityId },
}
