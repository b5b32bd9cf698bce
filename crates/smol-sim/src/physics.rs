//! Physics component — movement translation and collision policy.
//!
//! Each entity owns exactly one `PhysicsComponent`. Movement commands become
//! pending deltas that the entity applies to its position once per tick.
//! Collision resolution is selected by `PhysicsKind`, and produces
//! `CollisionEffect`s that the world applies after the scan.

use smol_core::commands::MovementCommand;
use smol_core::enums::{Direction, EntityKind};
use smol_core::error::{Result, SimError};
use smol_core::hitbox::HitBox;
use smol_core::types::{EntityId, Point};

use crate::collision::Contact;
use crate::world::World;

/// Concrete physics behaviour, chosen when the entity is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsKind {
    /// Bounces off obstacles it walks into.
    Player,
    /// Smashes enemies and swats projectiles while rigid.
    Weapon,
    /// Bites the player on contact, then goes away.
    Enemy { damage: u32 },
    /// Passive blocker.
    Obstacle,
    /// Flies along `heading`; hurts what it hits, then goes away.
    Projectile { heading: Direction, damage: u32 },
}

impl PhysicsKind {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            PhysicsKind::Player => EntityKind::Player,
            PhysicsKind::Weapon => EntityKind::Weapon,
            PhysicsKind::Enemy { .. } => EntityKind::Enemy,
            PhysicsKind::Obstacle => EntityKind::Obstacle,
            PhysicsKind::Projectile { .. } => EntityKind::Projectile,
        }
    }
}

/// A change requested by a collision policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEffect {
    /// Remove hit points from `target`'s health, if it has any.
    Damage { target: EntityId, amount: u32 },
    /// Mark `target` for removal. `smashed_by` is set when the weapon scored.
    Destroy {
        target: EntityId,
        smashed_by: Option<EntityId>,
    },
    /// Undo `target`'s last applied movement.
    Bounce { target: EntityId },
}

#[derive(Debug, Clone)]
pub struct PhysicsComponent {
    kind: PhysicsKind,
    movement_speed: f64,
    delta: Point,
    last_delta: Point,
    hit_box: HitBox,
    rigid: bool,
    owner: Option<EntityId>,
}

impl PhysicsComponent {
    pub fn new(kind: PhysicsKind, movement_speed: f64, hit_box: HitBox) -> Self {
        Self {
            kind,
            movement_speed: sanitize_speed(movement_speed),
            delta: Point::ZERO,
            last_delta: Point::ZERO,
            hit_box,
            rigid: true,
            owner: None,
        }
    }

    pub fn kind(&self) -> PhysicsKind {
        self.kind
    }

    pub fn movement_speed(&self) -> f64 {
        self.movement_speed
    }

    /// Negative or non-finite speeds clamp to zero.
    pub fn set_movement_speed(&mut self, movement_speed: f64) {
        self.movement_speed = sanitize_speed(movement_speed);
    }

    /// Movement accumulated this tick and not yet applied.
    pub fn delta(&self) -> Point {
        self.delta
    }

    pub fn hit_box(&self) -> &HitBox {
        &self.hit_box
    }

    pub fn is_rigid(&self) -> bool {
        self.rigid
    }

    pub fn set_rigid(&mut self, rigid: bool) {
        self.rigid = rigid;
    }

    /// The entity this component belongs to, once spawned.
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Attach to the owning entity. Happens once, at spawn.
    pub fn bind(&mut self, owner: EntityId) -> Result<()> {
        if let Some(existing) = self.owner {
            return Err(SimError::AlreadyBound(existing));
        }
        self.owner = Some(owner);
        Ok(())
    }

    /// Re-center the hit box on `center` without recording a movement.
    pub fn place_at(&mut self, center: Point) {
        self.hit_box = self.hit_box.centered_at(center);
    }

    /// Translate a command into pending movement.
    ///
    /// Directions add one step of `movement_speed`; targets add the vector
    /// towards the point, clipped to `movement_speed`.
    pub fn receive_movement(&mut self, command: MovementCommand) -> Result<()> {
        command.validate()?;
        let step = match command {
            MovementCommand::Direction { direction } => {
                direction.unit_vector() * self.movement_speed
            }
            MovementCommand::MoveTo { target } => {
                let from = self.hit_box.center() + self.delta;
                (target - from).clamp_length_max(self.movement_speed)
            }
        };
        self.delta += step;
        Ok(())
    }

    /// Command issued by the component itself when no input source drives it.
    pub fn autonomous_command(&self) -> Option<MovementCommand> {
        match self.kind {
            PhysicsKind::Projectile { heading, .. } => Some(MovementCommand::direction(heading)),
            _ => None,
        }
    }

    /// Hand the pending movement to the entity: the hit box follows it, the
    /// deltas reset and the movement is remembered for a bounce.
    pub fn take_delta(&mut self) -> Point {
        let delta = std::mem::replace(&mut self.delta, Point::ZERO);
        self.hit_box.translate(delta);
        self.last_delta = delta;
        delta
    }

    /// Roll back the last applied movement. Returns the delta the entity must
    /// subtract from its position; zero if already rolled back this tick.
    pub fn undo_last_move(&mut self) -> Point {
        let delta = std::mem::replace(&mut self.last_delta, Point::ZERO);
        self.hit_box.translate(-delta);
        delta
    }

    /// Resolve a rigid contact with `other` according to this component's
    /// kind.
    pub fn collision_event(&self, other: &Contact, effects: &mut Vec<CollisionEffect>) {
        let Some(me) = self.owner else {
            return;
        };
        match self.kind {
            PhysicsKind::Player => {
                if other.kind == EntityKind::Obstacle && self.moved_into(&other.hit_box) {
                    effects.push(CollisionEffect::Bounce { target: me });
                }
            }
            PhysicsKind::Weapon => match other.kind {
                EntityKind::Enemy => effects.push(CollisionEffect::Destroy {
                    target: other.id,
                    smashed_by: Some(me),
                }),
                EntityKind::Projectile => effects.push(CollisionEffect::Destroy {
                    target: other.id,
                    smashed_by: None,
                }),
                _ => {}
            },
            PhysicsKind::Enemy { damage } => {
                if other.kind == EntityKind::Player {
                    effects.push(CollisionEffect::Damage {
                        target: other.id,
                        amount: damage,
                    });
                    effects.push(CollisionEffect::Destroy {
                        target: me,
                        smashed_by: None,
                    });
                }
            }
            PhysicsKind::Obstacle => {}
            PhysicsKind::Projectile { damage, .. } => {
                // Projectiles pass through each other and the weapon.
                if matches!(other.kind, EntityKind::Projectile | EntityKind::Weapon) {
                    return;
                }
                if other.has_health {
                    effects.push(CollisionEffect::Damage {
                        target: other.id,
                        amount: damage,
                    });
                } else if other.kind == EntityKind::Enemy {
                    effects.push(CollisionEffect::Destroy {
                        target: other.id,
                        smashed_by: None,
                    });
                }
                effects.push(CollisionEffect::Destroy {
                    target: me,
                    smashed_by: None,
                });
            }
        }
    }

    /// Whether the last applied move pushed this shape into `other`: it was
    /// clear before, or it got closer to `other`'s center. Moving out of an
    /// overlap is never undone, so an entity spawned inside an obstacle can
    /// walk free.
    fn moved_into(&self, other: &HitBox) -> bool {
        let mut before = self.hit_box;
        before.translate(-self.last_delta);
        if !before.is_colliding(other) {
            return true;
        }
        let target = other.center();
        self.hit_box.center().distance_squared(target) < before.center().distance_squared(target)
    }

    /// First candidate, in the given order, whose hit box overlaps this one.
    ///
    /// Rigidity is ignored and the owner is skipped by identity. When several
    /// candidates overlap, which one is returned depends only on the order of
    /// `candidates`; sort them first if the answer must be stable.
    pub fn first_collision(&self, world: &World, candidates: &[EntityId]) -> Option<EntityId> {
        candidates
            .iter()
            .copied()
            .filter(|&id| Some(id) != self.owner)
            .find(|&id| {
                world
                    .physics(id)
                    .is_some_and(|other| self.hit_box.is_colliding(other.hit_box()))
            })
    }
}

fn sanitize_speed(speed: f64) -> f64 {
    if speed.is_finite() {
        speed.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f64, y: f64, speed: f64) -> PhysicsComponent {
        PhysicsComponent::new(
            PhysicsKind::Player,
            speed,
            HitBox::circle(Point::new(x, y), 1.0),
        )
    }

    fn contact(id: u64, kind: EntityKind, has_health: bool) -> Contact {
        Contact {
            id: EntityId(id),
            kind,
            rigid: true,
            has_health,
            hit_box: HitBox::circle(Point::ZERO, 1.0),
        }
    }

    fn wall_at(id: u64, x: f64, y: f64) -> Contact {
        Contact {
            hit_box: HitBox::rect(Point::new(x, y), 10.0, 10.0),
            ..contact(id, EntityKind::Obstacle, false)
        }
    }

    #[test]
    fn right_at_speed_five_moves_five_on_x() {
        let mut physics = player_at(0.0, 0.0, 5.0);
        physics
            .receive_movement(MovementCommand::direction(Direction::Right))
            .unwrap();
        assert_eq!(physics.delta(), Point::new(5.0, 0.0));
    }

    #[test]
    fn move_to_is_clipped_to_speed() {
        let mut physics = player_at(0.0, 0.0, 5.0);
        physics
            .receive_movement(MovementCommand::move_to(Point::new(0.0, 100.0)))
            .unwrap();
        assert_eq!(physics.delta(), Point::new(0.0, 5.0));
    }

    #[test]
    fn move_to_stops_on_target() {
        let mut physics = player_at(0.0, 0.0, 5.0);
        physics
            .receive_movement(MovementCommand::move_to(Point::new(3.0, 0.0)))
            .unwrap();
        assert_eq!(physics.delta(), Point::new(3.0, 0.0));
    }

    #[test]
    fn non_finite_target_is_rejected_without_moving() {
        let mut physics = player_at(0.0, 0.0, 5.0);
        let err = physics
            .receive_movement(MovementCommand::move_to(Point::new(f64::INFINITY, 0.0)))
            .unwrap_err();
        assert!(matches!(err, SimError::MalformedCommand(_)));
        assert_eq!(physics.delta(), Point::ZERO);
    }

    #[test]
    fn take_delta_resets_and_moves_hit_box() {
        let mut physics = player_at(0.0, 0.0, 5.0);
        physics
            .receive_movement(MovementCommand::direction(Direction::Down))
            .unwrap();
        let delta = physics.take_delta();
        assert_eq!(delta, Point::new(0.0, 5.0));
        assert_eq!(physics.delta(), Point::ZERO);
        assert_eq!(physics.hit_box().center(), Point::new(0.0, 5.0));

        let undone = physics.undo_last_move();
        assert_eq!(undone, delta);
        assert_eq!(physics.hit_box().center(), Point::ZERO);
        assert_eq!(physics.undo_last_move(), Point::ZERO);
    }

    #[test]
    fn negative_speed_clamps_to_zero() {
        let mut physics = player_at(0.0, 0.0, -3.0);
        assert_eq!(physics.movement_speed(), 0.0);
        physics.set_movement_speed(f64::NAN);
        assert_eq!(physics.movement_speed(), 0.0);
    }

    #[test]
    fn bind_happens_once() {
        let mut physics = player_at(0.0, 0.0, 1.0);
        physics.bind(EntityId(1)).unwrap();
        assert_eq!(
            physics.bind(EntityId(2)),
            Err(SimError::AlreadyBound(EntityId(1)))
        );
        assert_eq!(physics.owner(), Some(EntityId(1)));
    }

    #[test]
    fn enemy_bites_player_and_leaves() {
        let mut enemy = PhysicsComponent::new(
            PhysicsKind::Enemy { damage: 2 },
            0.0,
            HitBox::circle(Point::ZERO, 1.0),
        );
        enemy.bind(EntityId(7)).unwrap();

        let mut effects = Vec::new();
        enemy.collision_event(&contact(1, EntityKind::Player, true), &mut effects);
        assert_eq!(
            effects,
            vec![
                CollisionEffect::Damage {
                    target: EntityId(1),
                    amount: 2
                },
                CollisionEffect::Destroy {
                    target: EntityId(7),
                    smashed_by: None
                },
            ]
        );

        effects.clear();
        enemy.collision_event(&contact(2, EntityKind::Obstacle, false), &mut effects);
        assert!(effects.is_empty());
    }

    #[test]
    fn weapon_smashes_enemy() {
        let mut weapon =
            PhysicsComponent::new(PhysicsKind::Weapon, 10.0, HitBox::circle(Point::ZERO, 1.0));
        weapon.bind(EntityId(3)).unwrap();

        let mut effects = Vec::new();
        weapon.collision_event(&contact(9, EntityKind::Enemy, false), &mut effects);
        assert_eq!(
            effects,
            vec![CollisionEffect::Destroy {
                target: EntityId(9),
                smashed_by: Some(EntityId(3))
            }]
        );

        effects.clear();
        weapon.collision_event(&contact(1, EntityKind::Player, true), &mut effects);
        assert!(effects.is_empty(), "the hammer never hurts the player");
    }

    #[test]
    fn projectile_damages_health_and_destroys_itself() {
        let mut shot = PhysicsComponent::new(
            PhysicsKind::Projectile {
                heading: Direction::Right,
                damage: 1,
            },
            12.0,
            HitBox::circle(Point::ZERO, 1.0),
        );
        shot.bind(EntityId(4)).unwrap();
        assert_eq!(
            shot.autonomous_command(),
            Some(MovementCommand::direction(Direction::Right))
        );

        let mut effects = Vec::new();
        shot.collision_event(&contact(1, EntityKind::Player, true), &mut effects);
        assert!(effects.contains(&CollisionEffect::Damage {
            target: EntityId(1),
            amount: 1
        }));
        assert!(effects.contains(&CollisionEffect::Destroy {
            target: EntityId(4),
            smashed_by: None
        }));
    }

    #[test]
    fn player_bounces_when_walking_into_wall() {
        let mut player = player_at(0.0, 0.0, 5.0);
        player.bind(EntityId(1)).unwrap();
        player
            .receive_movement(MovementCommand::direction(Direction::Right))
            .unwrap();
        player.take_delta();

        let mut effects = Vec::new();
        player.collision_event(&wall_at(2, 10.0, 0.0), &mut effects);
        assert_eq!(effects, vec![CollisionEffect::Bounce { target: EntityId(1) }]);
    }

    #[test]
    fn player_inside_wall_may_walk_out() {
        let mut player = player_at(8.0, 0.0, 1.0);
        player.bind(EntityId(1)).unwrap();
        let wall = wall_at(2, 10.0, 0.0);

        player
            .receive_movement(MovementCommand::direction(Direction::Left))
            .unwrap();
        player.take_delta();
        let mut effects = Vec::new();
        player.collision_event(&wall, &mut effects);
        assert!(effects.is_empty());

        player
            .receive_movement(MovementCommand::direction(Direction::Right))
            .unwrap();
        player.take_delta();
        player.collision_event(&wall, &mut effects);
        assert_eq!(effects, vec![CollisionEffect::Bounce { target: EntityId(1) }]);
    }

    #[test]
    fn unbound_component_resolves_nothing() {
        let physics = player_at(0.0, 0.0, 1.0);
        let mut effects = Vec::new();
        physics.collision_event(&contact(2, EntityKind::Obstacle, false), &mut effects);
        assert!(effects.is_empty());
    }
}
