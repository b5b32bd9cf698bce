//! State shared between the engine's callers and the game loop thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use smol_core::state::WorldSnapshot;
use smol_core::types::EntityId;
use smol_sim::entity::EntityBlueprint;

/// Commands sent from callers to the game loop thread. Drained at the start
/// of every tick, so the world is only ever mutated on the loop thread.
#[derive(Debug)]
pub enum EngineCommand {
    /// Add an entity to the world.
    Spawn(EntityBlueprint),
    /// Remove an entity from the world.
    Despawn(EntityId),
}

/// What the loop thread publishes after every tick.
#[derive(Debug, Default)]
pub struct SharedState {
    /// Latest snapshot for synchronous polling.
    latest_snapshot: Mutex<Option<WorldSnapshot>>,
    /// Completed ticks: the highest simulation tick published so far.
    ticks: AtomicU64,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `snapshot` for polling. Only snapshots that moved the clock
    /// forward count as ticks; a finished session re-publishing its final
    /// state does not.
    pub fn publish(&self, snapshot: WorldSnapshot) {
        let tick = snapshot.time.tick;
        match self.latest_snapshot.lock() {
            Ok(mut lock) => *lock = Some(snapshot),
            Err(e) => {
                log::error!("snapshot lock poisoned, recovering");
                *e.into_inner() = Some(snapshot);
            }
        }
        self.ticks.fetch_max(tick, Ordering::SeqCst);
    }

    pub fn latest_snapshot(&self) -> Option<WorldSnapshot> {
        match self.latest_snapshot.lock() {
            Ok(lock) => lock.clone(),
            Err(e) => e.into_inner().clone(),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_state_creation() {
        let state = SharedState::new();
        assert!(state.latest_snapshot().is_none());
        assert_eq!(state.ticks(), 0);
    }

    fn at_tick(tick: u64, score: u32) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot {
            score,
            ..Default::default()
        };
        snapshot.time.tick = tick;
        snapshot
    }

    #[test]
    fn test_publish_counts_ticks() {
        let state = SharedState::new();
        state.publish(at_tick(1, 0));
        state.publish(at_tick(2, 3));
        assert_eq!(state.ticks(), 2);
        assert_eq!(state.latest_snapshot().unwrap().score, 3);
    }

    #[test]
    fn test_republished_final_state_is_not_a_tick() {
        let state = SharedState::new();
        state.publish(at_tick(7, 1));
        state.publish(at_tick(7, 1));
        state.publish(at_tick(7, 1));
        assert_eq!(state.ticks(), 7);
    }
}
