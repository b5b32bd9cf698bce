//! Threaded engine for SMOL.
//!
//! Runs a `GameState` on a dedicated loop thread with a cooperative
//! pause/resume handshake, and exposes it through `GameEngine`.

pub mod control;
pub mod engine;
pub mod game_loop;
pub mod host;
pub mod state;

pub use engine::GameEngine;
pub use game_loop::GameLoop;
pub use host::{ChannelHost, NullHost, RenderHost};
pub use smol_core as core;
pub use smol_sim as sim;
pub use smol_sim::SimConfig;
pub use state::EngineCommand;
