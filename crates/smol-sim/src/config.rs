//! Session configuration.

use serde::{Deserialize, Serialize};

use smol_core::constants::*;
use smol_core::error::{Result, SimError};
use smol_core::types::Bounds;

/// Configuration for starting a new session. Missing JSON fields take their
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same session.
    pub seed: u64,
    /// Ticks per second.
    pub tick_rate: u32,
    pub world_width: f64,
    pub world_height: f64,
    pub player_hit_points: u32,
    pub player_speed: f64,
    pub weapon_speed: f64,
    /// Turn the mole spawner on or off.
    pub spawn_enemies: bool,
    pub spawn_interval_ticks: u32,
    pub max_enemies: usize,
    /// Ticks a mole stays up before it retreats.
    pub enemy_lifetime_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tick_rate: TICK_RATE,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            player_hit_points: PLAYER_HIT_POINTS,
            player_speed: PLAYER_SPEED,
            weapon_speed: WEAPON_SPEED,
            spawn_enemies: true,
            spawn_interval_ticks: ENEMY_SPAWN_INTERVAL_TICKS,
            max_enemies: MAX_ENEMIES,
            enemy_lifetime_ticks: ENEMY_LIFETIME_TICKS,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 {
            return Err(SimError::Config("tick_rate must be positive".into()));
        }
        if !(self.world_width.is_finite() && self.world_width > 0.0)
            || !(self.world_height.is_finite() && self.world_height > 0.0)
        {
            return Err(SimError::Config(format!(
                "world size must be positive, got {}x{}",
                self.world_width, self.world_height
            )));
        }
        if self.player_hit_points == 0 {
            return Err(SimError::Config("player_hit_points must be positive".into()));
        }
        if !self.player_speed.is_finite() || !self.weapon_speed.is_finite() {
            return Err(SimError::Config("speeds must be finite".into()));
        }
        if self.spawn_enemies && self.spawn_interval_ticks == 0 {
            return Err(SimError::Config(
                "spawn_interval_ticks must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.tick_rate.max(1))
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.world_width, self.world_height)
    }
}
