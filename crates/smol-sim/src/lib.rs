//! Simulation for SMOL.
//!
//! Owns the entity world, advances it one tick at a time, resolves
//! collisions and produces `WorldSnapshot`s for the host. No threads here;
//! scheduling lives in `smol-engine`.

pub mod collision;
pub mod config;
pub mod entity;
pub mod game_state;
pub mod graphic;
pub mod input;
pub mod physics;
pub mod systems;
pub mod world;
pub mod world_setup;

pub use config::SimConfig;
pub use entity::EntityBlueprint;
pub use game_state::{GameState, WorldRequest};
pub use smol_core as core;
pub use world::{Flow, World};
