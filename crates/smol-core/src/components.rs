//! Plain data components shared between the simulation and its views.

use serde::{Deserialize, Serialize};

/// Hit points of an entity. Dead at zero, with no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthComponent {
    hit_points: u32,
}

impl HealthComponent {
    pub fn new(hit_points: u32) -> Self {
        Self { hit_points }
    }

    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    /// Remove `amount` hit points, saturating at zero.
    pub fn damage(&mut self, amount: u32) {
        self.hit_points = self.hit_points.saturating_sub(amount);
    }

    pub fn is_dead(&self) -> bool {
        self.hit_points == 0
    }
}

/// Marks an entity to be removed by the cleanup system at the end of the tick.
/// Marked entities are skipped by updates and collision scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destroyed;

/// Marks an entity whose death has already been reported to the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathReported;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hit_point_dies_after_one_damage() {
        let mut health = HealthComponent::new(1);
        assert!(!health.is_dead());
        health.damage(1);
        assert!(health.is_dead());
    }

    #[test]
    fn overkill_saturates_at_zero() {
        let mut health = HealthComponent::new(3);
        health.damage(10);
        assert_eq!(health.hit_points(), 0);
        assert!(health.is_dead());
        health.damage(1);
        assert_eq!(health.hit_points(), 0);
    }

    #[test]
    fn zero_damage_keeps_alive() {
        let mut health = HealthComponent::new(2);
        health.damage(0);
        assert_eq!(health.hit_points(), 2);
    }
}
