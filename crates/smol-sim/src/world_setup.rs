//! Entity factories and the default session layout.
//!
//! Creates the player, the weapon, the border walls, moles and projectiles
//! with the right component bundles.

use std::sync::Arc;

use smol_core::constants::*;
use smol_core::enums::Direction;
use smol_core::error::Result;
use smol_core::hitbox::HitBox;
use smol_core::types::{Bounds, Point};

use crate::config::SimConfig;
use crate::entity::EntityBlueprint;
use crate::input::InputSlot;
use crate::physics::{PhysicsComponent, PhysicsKind};
use crate::world::World;

/// Input handles for the UI thread to publish into.
#[derive(Debug, Clone)]
pub struct SessionInputs {
    /// Keyboard: held direction.
    pub player: InputSlot,
    /// Mouse: cursor position, and "hittable" while the button is down.
    pub weapon: InputSlot,
}

/// Set up the initial session: border walls, the player in the middle and
/// the weapon next to it. Moles are spawned later by the spawner system.
pub fn setup_session(world: &mut World, config: &SimConfig) -> Result<SessionInputs> {
    for wall in border_walls(config.bounds()) {
        world.spawn(wall)?;
    }

    let center = config.bounds().center();
    let inputs = SessionInputs {
        player: InputSlot::new(true),
        weapon: InputSlot::new(false),
    };

    world.spawn(
        player(center, config.player_speed, config.player_hit_points)
            .with_input(Arc::new(inputs.player.clone())),
    )?;
    world.spawn(
        weapon(
            center + Point::new(PLAYER_RADIUS + 2.0 * WEAPON_RADIUS, 0.0),
            config.weapon_speed,
        )
        .with_input(Arc::new(inputs.weapon.clone())),
    )?;

    Ok(inputs)
}

pub fn player(position: Point, speed: f64, hit_points: u32) -> EntityBlueprint {
    EntityBlueprint::new(
        position,
        PhysicsComponent::new(
            PhysicsKind::Player,
            speed,
            HitBox::circle(position, PLAYER_RADIUS),
        ),
    )
    .with_health(hit_points)
}

pub fn weapon(position: Point, speed: f64) -> EntityBlueprint {
    let mut physics = PhysicsComponent::new(
        PhysicsKind::Weapon,
        speed,
        HitBox::circle(position, WEAPON_RADIUS),
    );
    // Lifted until the input says otherwise.
    physics.set_rigid(false);
    EntityBlueprint::new(position, physics)
}

pub fn enemy(position: Point, lifetime_ticks: u32) -> EntityBlueprint {
    EntityBlueprint::new(
        position,
        PhysicsComponent::new(
            PhysicsKind::Enemy {
                damage: ENEMY_BITE_DAMAGE,
            },
            0.0,
            HitBox::circle(position, ENEMY_RADIUS),
        ),
    )
    .with_lifetime(lifetime_ticks)
}

pub fn obstacle(center: Point, width: f64, height: f64) -> EntityBlueprint {
    EntityBlueprint::new(
        center,
        PhysicsComponent::new(
            PhysicsKind::Obstacle,
            0.0,
            HitBox::rect(center, width, height),
        ),
    )
}

pub fn projectile(position: Point, heading: Direction) -> EntityBlueprint {
    EntityBlueprint::new(
        position,
        PhysicsComponent::new(
            PhysicsKind::Projectile {
                heading,
                damage: PROJECTILE_DAMAGE,
            },
            PROJECTILE_SPEED,
            HitBox::circle(position, PROJECTILE_RADIUS),
        ),
    )
}

/// Four walls lining the inside of the playfield.
pub fn border_walls(bounds: Bounds) -> Vec<EntityBlueprint> {
    let t = WALL_THICKNESS;
    let (w, h) = (bounds.width, bounds.height);
    vec![
        obstacle(Point::new(w / 2.0, t / 2.0), w, t),
        obstacle(Point::new(w / 2.0, h - t / 2.0), w, t),
        obstacle(Point::new(t / 2.0, h / 2.0), t, h),
        obstacle(Point::new(w - t / 2.0, h / 2.0), t, h),
    ]
}
