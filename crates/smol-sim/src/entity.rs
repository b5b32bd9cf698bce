//! Entity composition and the per-tick update of a single entity.
//!
//! An entity is not a struct of its own: it is a handle in the `World`'s
//! component store. `EntityBlueprint` collects the components before spawn;
//! `update` runs one entity's share of a tick.

use std::fmt;
use std::sync::Arc;

use smol_core::commands::MovementCommand;
use smol_core::components::HealthComponent;
use smol_core::enums::EntityKind;
use smol_core::error::{Result, SimError};
use smol_core::events::SimEvent;
use smol_core::types::{EntityId, Lifetime, Point};

use crate::graphic::{GraphicComponent, NullGraphic};
use crate::input::InputComponent;
use crate::physics::PhysicsComponent;
use crate::world::{self, Graphic, InputSource, Position, TickReport, World};

/// Everything needed to spawn an entity.
pub struct EntityBlueprint {
    pub(crate) position: Point,
    pub(crate) physics: PhysicsComponent,
    pub(crate) health: Option<HealthComponent>,
    pub(crate) input: Option<Arc<dyn InputComponent>>,
    pub(crate) graphic: Box<dyn GraphicComponent>,
    pub(crate) lifetime: Option<Lifetime>,
}

impl EntityBlueprint {
    /// The entity kind follows from the physics component's kind.
    pub fn new(position: Point, physics: PhysicsComponent) -> Self {
        Self {
            position,
            physics,
            health: None,
            input: None,
            graphic: Box::new(NullGraphic),
            lifetime: None,
        }
    }

    pub fn with_health(mut self, hit_points: u32) -> Self {
        self.health = Some(HealthComponent::new(hit_points));
        self
    }

    pub fn with_input(mut self, input: Arc<dyn InputComponent>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_graphic(mut self, graphic: impl GraphicComponent + 'static) -> Self {
        self.graphic = Box::new(graphic);
        self
    }

    pub fn with_lifetime(mut self, ticks: u32) -> Self {
        self.lifetime = Some(Lifetime::new(ticks));
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.physics.kind().entity_kind()
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

impl fmt::Debug for EntityBlueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityBlueprint")
            .field("kind", &self.kind())
            .field("position", &self.position)
            .field("health", &self.health)
            .field("has_input", &self.input.is_some())
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Run one entity's update: input, movement, collisions, health, graphic.
pub(crate) fn update(world: &mut World, entity: hecs::Entity, report: &mut TickReport) -> Result<()> {
    let id = world::id_of(entity);

    read_input(world, entity, id)?;
    apply_movement(world, entity, id)?;
    resolve_collisions(world, id, report);

    if world.report_death(entity) {
        log::debug!("{id} is dead");
        report.deaths.push(id);
        report.events.push(SimEvent::Died { entity: id });
    }

    render(world, entity, id);
    Ok(())
}

/// Feed this tick's commands into physics. Without an input source,
/// autonomous kinds drive themselves.
fn read_input(world: &World, entity: hecs::Entity, id: EntityId) -> Result<()> {
    let source = world
        .store()
        .get::<&InputSource>(entity)
        .ok()
        .map(|s| Arc::clone(&s.0));

    let mut physics = world
        .store()
        .get::<&mut PhysicsComponent>(entity)
        .map_err(|_| SimError::EntityNotFound(id))?;

    match source {
        Some(source) => {
            let frame = source.frame();
            physics.set_rigid(frame.hittable);
            if let Some(direction) = frame.direction {
                feed(&mut physics, MovementCommand::direction(direction), id);
            }
            if let Some(target) = frame.position {
                feed(&mut physics, MovementCommand::move_to(target), id);
            }
        }
        None => {
            if let Some(command) = physics.autonomous_command() {
                feed(&mut physics, command, id);
            }
        }
    }
    Ok(())
}

fn feed(physics: &mut PhysicsComponent, command: MovementCommand, id: EntityId) {
    if let Err(e) = physics.receive_movement(command) {
        log::warn!("{id}: skipping command: {e}");
    }
}

fn apply_movement(world: &World, entity: hecs::Entity, id: EntityId) -> Result<()> {
    let delta = world
        .store()
        .get::<&mut PhysicsComponent>(entity)
        .map_err(|_| SimError::EntityNotFound(id))?
        .take_delta();
    if delta != Point::ZERO {
        let mut position = world
            .store()
            .get::<&mut Position>(entity)
            .map_err(|_| SimError::EntityNotFound(id))?;
        position.0 += delta;
    }
    Ok(())
}

/// Scan for contacts and resolve the rigid ones. Non-rigid contacts are
/// detected but left alone.
fn resolve_collisions(world: &mut World, id: EntityId, report: &mut TickReport) {
    let contacts = world.contacts_of(id);
    if contacts.is_empty() {
        return;
    }

    let mut effects = Vec::new();
    if let Some(physics) = world.physics(id) {
        if !physics.is_rigid() {
            return;
        }
        for contact in contacts.iter().filter(|c| c.rigid) {
            log::debug!("{id} hit {:?} {}", contact.kind, contact.id);
            physics.collision_event(contact, &mut effects);
            report.events.push(SimEvent::Collision {
                source: id,
                other: contact.id,
            });
        }
    }
    world.apply_effects(effects, report);
}

fn render(world: &World, entity: hecs::Entity, id: EntityId) {
    let Some(view) = world.view(id) else {
        return;
    };
    if let Ok(mut graphic) = world.store().get::<&mut Graphic>(entity) {
        if let Err(e) = graphic.0.update(&view) {
            log::error!("graphic update of {id} failed: {e}");
        }
    }
}
