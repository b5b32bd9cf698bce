//! World snapshot — the complete visible state handed to the render host
//! after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, SessionPhase};
use crate::events::SimEvent;
use crate::hitbox::HitBox;
use crate::types::{EntityId, Point, SimTime};

/// Read-only view of one entity, as passed to graphic sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Point,
    pub hit_box: HitBox,
    pub rigid: bool,
    /// `None` for entities without a health component.
    pub hit_points: Option<u32>,
}

/// Complete session state after a tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub score: u32,
    /// Entities in world iteration order.
    pub entities: Vec<EntityView>,
    /// Events produced during the tick.
    pub events: Vec<SimEvent>,
}

impl WorldSnapshot {
    pub fn entity(&self, id: EntityId) -> Option<&EntityView> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}
