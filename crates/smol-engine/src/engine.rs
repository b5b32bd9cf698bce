//! `GameEngine` — the façade a host application talks to.
//!
//! `init` builds the game state and its world, populates the default session
//! and starts the loop. The host then publishes input through the two input
//! slots and polls (or receives) snapshots.

use smol_core::enums::LoopState;
use smol_core::error::Result;
use smol_core::state::WorldSnapshot;
use smol_sim::config::SimConfig;
use smol_sim::game_state::GameState;
use smol_sim::input::InputSlot;
use smol_sim::world_setup::SessionInputs;

use crate::game_loop::GameLoop;
use crate::host::RenderHost;
use crate::state::EngineCommand;

pub struct GameEngine {
    game_loop: GameLoop,
    inputs: SessionInputs,
}

impl GameEngine {
    /// Build a session from `config` and start ticking it.
    pub fn init(host: impl RenderHost + 'static, config: SimConfig) -> Result<Self> {
        let seed = config.seed;
        let mut game = GameState::new(config)?;
        let inputs = game.setup_session()?;
        log::info!(
            "session ready: {} entities, seed {seed}",
            game.world().len()
        );

        let game_loop = GameLoop::new(game, Box::new(host));
        game_loop.start()?;
        Ok(Self { game_loop, inputs })
    }

    /// Resume after `stop`.
    pub fn run(&self) -> Result<()> {
        self.game_loop.run()
    }

    /// Pause; returns once the loop thread has parked.
    pub fn stop(&self) -> Result<()> {
        self.game_loop.stop()
    }

    pub fn shutdown(&self) -> Result<()> {
        self.game_loop.shutdown()
    }

    pub fn is_running(&self) -> bool {
        self.game_loop.is_running()
    }

    pub fn state(&self) -> LoopState {
        self.game_loop.state()
    }

    pub fn ticks(&self) -> u64 {
        self.game_loop.ticks()
    }

    /// Keyboard slot driving the player.
    pub fn player_input(&self) -> &InputSlot {
        &self.inputs.player
    }

    /// Mouse slot driving the weapon.
    pub fn weapon_input(&self) -> &InputSlot {
        &self.inputs.weapon
    }

    pub fn send(&self, command: EngineCommand) -> Result<()> {
        self.game_loop.send(command)
    }

    pub fn latest_snapshot(&self) -> Option<WorldSnapshot> {
        self.game_loop.latest_snapshot()
    }
}
