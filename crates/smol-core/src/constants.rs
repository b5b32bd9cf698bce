//! Simulation constants and tuning parameters.

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Default RNG seed. Same seed = same session.
pub const DEFAULT_SEED: u64 = 42;

// --- World bounds ---

/// Playfield width in pixels.
pub const WORLD_WIDTH: f64 = 1280.0;

/// Playfield height in pixels.
pub const WORLD_HEIGHT: f64 = 720.0;

/// Thickness of the obstacle walls placed along the border.
pub const WALL_THICKNESS: f64 = 16.0;

// --- Player ---

pub const PLAYER_HIT_POINTS: u32 = 5;

/// Pixels per tick.
pub const PLAYER_SPEED: f64 = 5.0;

pub const PLAYER_RADIUS: f64 = 24.0;

// --- Weapon (hammer) ---

/// Pixels per tick while chasing the cursor.
pub const WEAPON_SPEED: f64 = 40.0;

pub const WEAPON_RADIUS: f64 = 20.0;

// --- Enemies (moles) ---

pub const ENEMY_RADIUS: f64 = 22.0;

/// Damage a mole deals to the player on contact.
pub const ENEMY_BITE_DAMAGE: u32 = 1;

/// Ticks between spawn attempts (1.5s at 60Hz).
pub const ENEMY_SPAWN_INTERVAL_TICKS: u32 = 90;

/// Ticks a mole stays up before retreating (3s at 60Hz).
pub const ENEMY_LIFETIME_TICKS: u32 = 180;

pub const MAX_ENEMIES: usize = 6;

/// Random placements tried before a spawn is skipped for this interval.
pub const SPAWN_PLACEMENT_ATTEMPTS: u32 = 16;

// --- Projectiles ---

/// Pixels per tick.
pub const PROJECTILE_SPEED: f64 = 12.0;

pub const PROJECTILE_RADIUS: f64 = 4.0;

pub const PROJECTILE_DAMAGE: u32 = 1;

/// Points awarded per smashed mole.
pub const SCORE_PER_ENEMY: u32 = 1;
