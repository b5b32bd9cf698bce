//! The world: authoritative, insertion-ordered collection of live entities.
//!
//! Components are stored in a `hecs::World`; `order` keeps the handles in the
//! order entities were spawned, which is the order they are updated in. An
//! entity's identity is its handle, never the value of its components.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use smol_core::components::{DeathReported, Destroyed, HealthComponent};
use smol_core::enums::EntityKind;
use smol_core::error::{Result, SimError};
use smol_core::events::SimEvent;
use smol_core::state::EntityView;
use smol_core::types::{Bounds, EntityId, Lifetime, Point};

use crate::collision::{BroadPhase, BruteForce, Contact};
use crate::entity::{self, EntityBlueprint};
use crate::graphic::GraphicComponent;
use crate::input::InputComponent;
use crate::physics::{CollisionEffect, PhysicsComponent};

/// Entity position. The single source of truth; hit boxes follow it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Point);

pub(crate) struct InputSource(pub(crate) Arc<dyn InputComponent>);

pub(crate) struct Graphic(pub(crate) Box<dyn GraphicComponent>);

/// Whether an entity pass should go on after a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Abandon the pass (the loop is shutting down).
    Halt,
}

/// What happened during one entity pass, for the game state to act on.
#[derive(Debug, Default)]
pub struct TickReport {
    pub events: Vec<SimEvent>,
    /// Entities whose death was detected this pass. Each entity appears at
    /// most once over its lifetime.
    pub deaths: Vec<EntityId>,
    /// Enemies smashed by the weapon.
    pub smashed: u32,
}

pub struct World {
    store: hecs::World,
    order: Vec<hecs::Entity>,
    broad_phase: Box<dyn BroadPhase>,
    bounds: Bounds,
}

impl World {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_broad_phase(bounds, Box::new(BruteForce))
    }

    pub fn with_broad_phase(bounds: Bounds, broad_phase: Box<dyn BroadPhase>) -> Self {
        Self {
            store: hecs::World::new(),
            order: Vec::new(),
            broad_phase,
            bounds,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Add an entity. Its hit box is centered on its position and its physics
    /// component is bound to the new handle.
    pub fn spawn(&mut self, blueprint: EntityBlueprint) -> Result<EntityId> {
        let EntityBlueprint {
            position,
            mut physics,
            health,
            input,
            graphic,
            lifetime,
        } = blueprint;

        let kind = physics.kind().entity_kind();
        physics.place_at(position);

        let mut builder = hecs::EntityBuilder::new();
        builder
            .add(kind)
            .add(Position(position))
            .add(Graphic(graphic));
        if let Some(health) = health {
            builder.add(health);
        }
        if let Some(input) = input {
            builder.add(InputSource(input));
        }
        if let Some(lifetime) = lifetime {
            builder.add(lifetime);
        }

        let entity = self.store.spawn(builder.build());
        let id = id_of(entity);
        if let Err(e) = physics.bind(id) {
            let _ = self.store.despawn(entity);
            return Err(e);
        }
        self.store
            .insert_one(entity, physics)
            .map_err(|_| SimError::EntityNotFound(id))?;
        self.order.push(entity);

        log::debug!("spawned {kind:?} {id} at ({:.1}, {:.1})", position.x, position.y);
        Ok(id)
    }

    /// Remove an entity right away. Returns its kind.
    pub fn despawn(&mut self, id: EntityId) -> Result<EntityKind> {
        let entity = self.handle(id).ok_or(SimError::EntityNotFound(id))?;
        let kind = self.kind(id).ok_or(SimError::EntityNotFound(id))?;
        self.store
            .despawn(entity)
            .map_err(|_| SimError::EntityNotFound(id))?;
        self.order.retain(|&e| e != entity);
        log::debug!("despawned {kind:?} {id}");
        Ok(kind)
    }

    /// Live entities in update order.
    pub fn entities(&self) -> impl ExactSizeIterator<Item = EntityId> + '_ {
        self.order.iter().map(|&e| id_of(e))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.handle(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.store
            .query::<&EntityKind>()
            .iter()
            .filter(|(_, k)| **k == kind)
            .count()
    }

    pub fn kind(&self, id: EntityId) -> Option<EntityKind> {
        let entity = self.handle(id)?;
        self.store.get::<&EntityKind>(entity).ok().map(|k| *k)
    }

    pub fn position(&self, id: EntityId) -> Option<Point> {
        let entity = self.handle(id)?;
        self.store.get::<&Position>(entity).ok().map(|p| p.0)
    }

    pub fn physics(&self, id: EntityId) -> Option<hecs::Ref<'_, PhysicsComponent>> {
        let entity = self.handle(id)?;
        self.store.get::<&PhysicsComponent>(entity).ok()
    }

    pub fn physics_mut(&mut self, id: EntityId) -> Option<hecs::RefMut<'_, PhysicsComponent>> {
        let entity = self.handle(id)?;
        self.store.get::<&mut PhysicsComponent>(entity).ok()
    }

    pub fn health(&self, id: EntityId) -> Option<HealthComponent> {
        let entity = self.handle(id)?;
        self.store.get::<&HealthComponent>(entity).ok().map(|h| *h)
    }

    pub fn lifetime(&self, id: EntityId) -> Option<Lifetime> {
        let entity = self.handle(id)?;
        self.store.get::<&Lifetime>(entity).ok().map(|l| *l)
    }

    pub fn is_destroyed(&self, id: EntityId) -> bool {
        self.handle(id)
            .is_some_and(|e| self.store.get::<&Destroyed>(e).is_ok())
    }

    /// Flag an entity for removal at the end of the tick. Returns false if it
    /// was already flagged or is gone.
    pub fn mark_destroyed(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.handle(id) else {
            return false;
        };
        if self.store.get::<&Destroyed>(entity).is_ok() {
            return false;
        }
        self.store.insert_one(entity, Destroyed).is_ok()
    }

    /// Read-only view handed to graphic sinks and snapshots.
    pub fn view(&self, id: EntityId) -> Option<EntityView> {
        let entity = self.handle(id)?;
        let kind = *self.store.get::<&EntityKind>(entity).ok()?;
        let position = self.store.get::<&Position>(entity).ok()?.0;
        let physics = self.store.get::<&PhysicsComponent>(entity).ok()?;
        let hit_points = self
            .store
            .get::<&HealthComponent>(entity)
            .ok()
            .map(|h| h.hit_points());
        Some(EntityView {
            id,
            kind,
            position,
            hit_box: *physics.hit_box(),
            rigid: physics.is_rigid(),
            hit_points,
        })
    }

    pub fn contact(&self, id: EntityId) -> Option<Contact> {
        let entity = self.handle(id)?;
        let kind = *self.store.get::<&EntityKind>(entity).ok()?;
        let (rigid, hit_box) = {
            let physics = self.store.get::<&PhysicsComponent>(entity).ok()?;
            (physics.is_rigid(), *physics.hit_box())
        };
        let has_health = self.store.get::<&HealthComponent>(entity).is_ok();
        Some(Contact {
            id,
            kind,
            rigid,
            has_health,
            hit_box,
        })
    }

    /// Contacts of `subject`'s current hit box, via the broad phase.
    pub fn contacts_of(&self, subject: EntityId) -> Vec<Contact> {
        let Some(hit_box) = self.physics(subject).map(|p| *p.hit_box()) else {
            return Vec::new();
        };
        self.broad_phase.contacts(self, subject, &hit_box)
    }

    /// Advance every entity by one tick, in world order.
    ///
    /// `checkpoint` runs before each entity; it may block (pause) and may ask
    /// to abandon the pass. Entities spawned or despawned by the game state
    /// while a pass is suspended are not touched until the next pass. A
    /// failing or panicking entity is logged and skipped; the pass goes on.
    pub fn update_all(
        &mut self,
        report: &mut TickReport,
        checkpoint: &mut dyn FnMut() -> Flow,
    ) -> Flow {
        let order = self.order.clone();
        for entity in order {
            if checkpoint() == Flow::Halt {
                return Flow::Halt;
            }
            if !self.store.contains(entity) || self.store.get::<&Destroyed>(entity).is_ok() {
                continue;
            }

            let id = id_of(entity);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                entity::update(self, entity, report)
            }));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::error!("update of {id} failed: {e}"),
                Err(payload) => {
                    log::error!("update of {id} panicked: {}", panic_message(&*payload))
                }
            }
        }
        Flow::Continue
    }

    /// Apply the outcome of one entity's collision scan.
    pub(crate) fn apply_effects(&mut self, effects: Vec<CollisionEffect>, report: &mut TickReport) {
        for effect in effects {
            match effect {
                CollisionEffect::Damage { target, amount } => {
                    let Some(entity) = self.handle(target) else {
                        continue;
                    };
                    if let Ok(mut health) = self.store.get::<&mut HealthComponent>(entity) {
                        health.damage(amount);
                        log::debug!("{target} took {amount}, {} left", health.hit_points());
                        report.events.push(SimEvent::Damaged {
                            target,
                            amount,
                            remaining: health.hit_points(),
                        });
                    }
                }
                CollisionEffect::Destroy { target, smashed_by } => {
                    if !self.mark_destroyed(target) {
                        continue;
                    }
                    if let Some(by) = smashed_by {
                        report.smashed += 1;
                        report.events.push(SimEvent::EnemySmashed { enemy: target, by });
                    }
                }
                CollisionEffect::Bounce { target } => {
                    let Some(entity) = self.handle(target) else {
                        continue;
                    };
                    let undone = match self.store.get::<&mut PhysicsComponent>(entity) {
                        Ok(mut physics) => physics.undo_last_move(),
                        Err(_) => continue,
                    };
                    if let Ok(mut position) = self.store.get::<&mut Position>(entity) {
                        position.0 -= undone;
                    }
                }
            }
        }
    }

    /// Record the death of `entity` once. Returns true the first time.
    pub(crate) fn report_death(&mut self, entity: hecs::Entity) -> bool {
        let dead = self
            .store
            .get::<&HealthComponent>(entity)
            .is_ok_and(|h| h.is_dead());
        let reported = self.store.get::<&DeathReported>(entity).is_ok();
        if !dead || reported {
            return false;
        }
        self.store.insert_one(entity, DeathReported).is_ok()
    }

    pub(crate) fn store(&self) -> &hecs::World {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut hecs::World {
        &mut self.store
    }

    /// Drop handles whose entities were despawned through `store_mut`.
    pub(crate) fn retain_live(&mut self) {
        let store = &self.store;
        self.order.retain(|&e| store.contains(e));
    }

    fn handle(&self, id: EntityId) -> Option<hecs::Entity> {
        hecs::Entity::from_bits(id.0).filter(|&e| self.store.contains(e))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Bounds::new(
            smol_core::constants::WORLD_WIDTH,
            smol_core::constants::WORLD_HEIGHT,
        ))
    }
}

pub(crate) fn id_of(entity: hecs::Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
