//! Game state — owns the world and everything that outlives a single tick.
//!
//! `GameState` processes queued spawn/despawn requests, runs the systems and
//! the entity pass, detects the end of the session and produces
//! `WorldSnapshot`s. Completely headless and single-threaded, which keeps it
//! deterministic for a given seed and input sequence.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use smol_core::constants::SCORE_PER_ENEMY;
use smol_core::enums::SessionPhase;
use smol_core::error::Result;
use smol_core::events::SimEvent;
use smol_core::state::WorldSnapshot;
use smol_core::types::{EntityId, SimTime};

use crate::config::SimConfig;
use crate::entity::EntityBlueprint;
use crate::systems;
use crate::systems::spawner::SpawnSchedule;
use crate::world::{Flow, TickReport, World};
use crate::world_setup::{self, SessionInputs};

/// A change to the entity collection, applied at the start of the next tick.
#[derive(Debug)]
pub enum WorldRequest {
    Spawn(EntityBlueprint),
    Despawn(EntityId),
}

pub struct GameState {
    world: World,
    config: SimConfig,
    time: SimTime,
    phase: SessionPhase,
    rng: ChaCha8Rng,
    schedule: SpawnSchedule,
    score: u32,
    death_notifications: u32,
    requests: VecDeque<WorldRequest>,
    events: Vec<SimEvent>,
    despawn_buffer: Vec<hecs::Entity>,
}

impl GameState {
    /// Create an empty session. The configuration is validated first.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            world: World::new(config.bounds()),
            time: SimTime::default(),
            phase: SessionPhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            schedule: SpawnSchedule::new(&config),
            score: 0,
            death_notifications: 0,
            requests: VecDeque::new(),
            events: Vec::new(),
            despawn_buffer: Vec::new(),
            config,
        })
    }

    /// Populate the world with the default layout and hand back the input
    /// slots for the player and the weapon.
    pub fn setup_session(&mut self) -> Result<SessionInputs> {
        world_setup::setup_session(&mut self.world, &self.config)
    }

    /// Queue a request for processing at the next tick boundary.
    pub fn queue(&mut self, request: WorldRequest) {
        self.requests.push_back(request);
    }

    /// Spawn immediately. Only valid between ticks.
    pub fn spawn(&mut self, blueprint: EntityBlueprint) -> Result<EntityId> {
        let position = blueprint.position();
        let kind = blueprint.kind();
        let id = self.world.spawn(blueprint)?;
        self.events.push(SimEvent::Spawned {
            entity: id,
            kind,
            position,
        });
        Ok(id)
    }

    /// Advance the session by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> WorldSnapshot {
        self.tick_with(&mut || Flow::Continue)
            .unwrap_or_else(|| self.snapshot())
    }

    /// Advance by one tick, calling `checkpoint` before each entity. Returns
    /// `None` if the checkpoint abandoned the pass.
    ///
    /// Once the session is over, nothing moves any more and every call
    /// re-emits the final snapshot.
    pub fn tick_with(&mut self, checkpoint: &mut dyn FnMut() -> Flow) -> Option<WorldSnapshot> {
        if self.is_over() {
            return Some(self.snapshot());
        }

        self.process_requests();
        systems::spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.schedule,
            &mut self.events,
        );

        let mut report = TickReport::default();
        let flow = self.world.update_all(&mut report, checkpoint);
        self.events.append(&mut report.events);
        self.score += report.smashed * SCORE_PER_ENEMY;
        for entity in report.deaths {
            self.notify_death(entity);
        }
        if flow == Flow::Halt {
            return None;
        }

        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer, &mut self.events);
        self.time.advance(self.config.dt());
        log::trace!("tick {} done, {} entities", self.time.tick, self.world.len());

        let events = std::mem::take(&mut self.events);
        Some(systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.score,
            events,
        ))
    }

    /// One-way signal that an entity died. The first call ends the session;
    /// later calls only count.
    pub fn notify_death(&mut self, entity: EntityId) {
        self.death_notifications += 1;
        if self.phase == SessionPhase::Over {
            return;
        }
        log::info!(
            "{entity} died at tick {}, session over with score {}",
            self.time.tick,
            self.score
        );
        self.phase = SessionPhase::Over;
    }

    /// Snapshot of the current state without ticking. Carries no events.
    pub fn snapshot(&self) -> WorldSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.score,
            Vec::new(),
        )
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Over
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// How many times `notify_death` has been called.
    pub fn death_notifications(&self) -> u32 {
        self.death_notifications
    }

    /// Get a read-only reference to the world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access, for setup between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn process_requests(&mut self) {
        while let Some(request) = self.requests.pop_front() {
            match request {
                WorldRequest::Spawn(blueprint) => {
                    if let Err(e) = self.spawn(blueprint) {
                        log::warn!("spawn request rejected: {e}");
                    }
                }
                WorldRequest::Despawn(id) => match self.world.despawn(id) {
                    Ok(kind) => self.events.push(SimEvent::Despawned { entity: id, kind }),
                    Err(e) => log::warn!("despawn request rejected: {e}"),
                },
            }
        }
    }
}
