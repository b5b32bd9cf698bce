//! Systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only).
//! Any state they carry across ticks lives in a small struct owned by the
//! game state.

pub mod cleanup;
pub mod snapshot;
pub mod spawner;
