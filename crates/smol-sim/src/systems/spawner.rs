//! Mole spawner: pops enemies up at random free spots on a fixed interval.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use smol_core::constants::{ENEMY_RADIUS, SPAWN_PLACEMENT_ATTEMPTS, WALL_THICKNESS};
use smol_core::enums::EntityKind;
use smol_core::events::SimEvent;
use smol_core::hitbox::HitBox;
use smol_core::types::{EntityId, Point};

use crate::config::SimConfig;
use crate::physics::{PhysicsComponent, PhysicsKind};
use crate::world::World;
use crate::world_setup;

/// Spawn cadence and limits.
#[derive(Debug, Clone)]
pub struct SpawnSchedule {
    pub enabled: bool,
    pub interval_ticks: u32,
    pub max_enemies: usize,
    pub lifetime_ticks: u32,
    /// Ticks left until the next spawn attempt.
    pub countdown: u32,
    /// Enemies spawned so far.
    pub spawned: u32,
}

impl SpawnSchedule {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            enabled: config.spawn_enemies,
            interval_ticks: config.spawn_interval_ticks.max(1),
            max_enemies: config.max_enemies,
            lifetime_ticks: config.enemy_lifetime_ticks,
            countdown: config.spawn_interval_ticks.max(1),
            spawned: 0,
        }
    }
}

/// Count down and, when due, spawn one mole if there is room for it.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    schedule: &mut SpawnSchedule,
    events: &mut Vec<SimEvent>,
) {
    if !schedule.enabled {
        return;
    }
    schedule.countdown = schedule.countdown.saturating_sub(1);
    if schedule.countdown > 0 {
        return;
    }
    schedule.countdown = schedule.interval_ticks;

    if world.count_of(EntityKind::Enemy) >= schedule.max_enemies {
        return;
    }

    let Some(spot) = find_free_spot(world, rng) else {
        log::debug!("no free spot for a mole this round");
        return;
    };

    match world.spawn(world_setup::enemy(spot, schedule.lifetime_ticks)) {
        Ok(id) => {
            schedule.spawned += 1;
            log::debug!("mole #{} up at {spot} as {id}", schedule.spawned);
            events.push(SimEvent::Spawned {
                entity: id,
                kind: EntityKind::Enemy,
                position: spot,
            });
        }
        Err(e) => log::error!("mole spawn failed: {e}"),
    }
}

/// Random point inside the walls where a mole would not overlap anything.
/// Gives up after a fixed number of attempts.
pub fn find_free_spot(world: &World, rng: &mut ChaCha8Rng) -> Option<Point> {
    let bounds = world.bounds();
    let margin = WALL_THICKNESS + ENEMY_RADIUS;
    if bounds.width <= 2.0 * margin || bounds.height <= 2.0 * margin {
        return None;
    }

    let candidates: Vec<EntityId> = world.entities().collect();
    for _ in 0..SPAWN_PLACEMENT_ATTEMPTS {
        let spot = Point::new(
            rng.gen_range(margin..bounds.width - margin),
            rng.gen_range(margin..bounds.height - margin),
        );
        let footprint = PhysicsComponent::new(
            PhysicsKind::Enemy { damage: 0 },
            0.0,
            HitBox::circle(spot, ENEMY_RADIUS),
        );
        if footprint.first_collision(world, &candidates).is_none() {
            return Some(spot);
        }
    }
    None
}
