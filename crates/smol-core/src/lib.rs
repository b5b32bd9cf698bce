//! Core types and definitions for the SMOL simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, hit boxes, commands, components, snapshots, events, constants
//! and the error type. It has no dependency on threading or rendering.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod hitbox;
pub mod state;
pub mod types;

pub use error::{Result, SimError};

#[cfg(test)]
mod tests;
