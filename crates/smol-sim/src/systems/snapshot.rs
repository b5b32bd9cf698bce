//! Snapshot system: builds a `WorldSnapshot` from the current world.
//!
//! This system is read-only — it never modifies the world.

use smol_core::enums::SessionPhase;
use smol_core::events::SimEvent;
use smol_core::state::WorldSnapshot;
use smol_core::types::SimTime;

use crate::world::World;

/// Build a complete snapshot. Entities appear in world order.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: SessionPhase,
    score: u32,
    events: Vec<SimEvent>,
) -> WorldSnapshot {
    WorldSnapshot {
        time: *time,
        phase,
        score,
        entities: world.entities().filter_map(|id| world.view(id)).collect(),
        events,
    }
}
