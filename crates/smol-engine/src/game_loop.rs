//! Game loop thread — ticks the game state at a fixed rate and hands each
//! snapshot to the render host.
//!
//! The game state is moved into the loop thread when it starts, so only that
//! thread ever touches the world. Callers talk to it through the `LoopControl`
//! monitor (pause/resume/shutdown) and an `mpsc` channel (spawn/despawn).
//! Snapshots are stored in shared state for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use smol_core::enums::LoopState;
use smol_core::error::{Result, SimError};
use smol_core::state::WorldSnapshot;
use smol_sim::game_state::{GameState, WorldRequest};
use smol_sim::world::Flow;

use crate::control::LoopControl;
use crate::host::RenderHost;
use crate::state::{EngineCommand, SharedState};

/// Everything the loop thread takes ownership of when it starts.
struct LoopParts {
    game: GameState,
    host: Box<dyn RenderHost>,
    commands: mpsc::Receiver<EngineCommand>,
}

pub struct GameLoop {
    control: Arc<LoopControl>,
    shared: Arc<SharedState>,
    /// Serializes `run`/`stop` so only one transition is honored at a time.
    transition: Mutex<()>,
    parts: Mutex<Option<LoopParts>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    command_tx: Mutex<mpsc::Sender<EngineCommand>>,
    tick_duration: Duration,
}

impl GameLoop {
    /// Wrap a game state. Nothing runs until `start`.
    pub fn new(game: GameState, host: Box<dyn RenderHost>) -> Self {
        let (command_tx, commands) = mpsc::channel::<EngineCommand>();
        let tick_duration = Duration::from_secs_f64(game.config().dt());
        Self {
            control: Arc::new(LoopControl::new()),
            shared: Arc::new(SharedState::new()),
            transition: Mutex::new(()),
            parts: Mutex::new(Some(LoopParts {
                game,
                host,
                commands,
            })),
            handle: Mutex::new(None),
            command_tx: Mutex::new(command_tx),
            tick_duration,
        }
    }

    /// Spawn the loop thread. `Created -> Running`.
    pub fn start(&self) -> Result<()> {
        let _transition = lock(&self.transition);
        let parts = lock(&self.parts).take().ok_or(SimError::InvalidState {
            action: "start",
            state: self.control.state(),
        })?;
        self.control.begin()?;

        let control = Arc::clone(&self.control);
        let shared = Arc::clone(&self.shared);
        let tick_duration = self.tick_duration;
        let spawned = std::thread::Builder::new()
            .name("smol-game-loop".into())
            .spawn(move || {
                run_game_loop(parts, &control, &shared, tick_duration);
            });

        match spawned {
            Ok(handle) => {
                *lock(&self.handle) = Some(handle);
                log::info!(
                    "game loop started at {:.0} Hz",
                    1.0 / self.tick_duration.as_secs_f64()
                );
                Ok(())
            }
            Err(e) => {
                self.control.mark_stopped();
                Err(SimError::Thread(format!("failed to spawn game loop thread: {e}")))
            }
        }
    }

    /// Resume a paused loop. `Paused -> Running`.
    pub fn run(&self) -> Result<()> {
        let _transition = lock(&self.transition);
        self.control.resume().inspect_err(|e| log::warn!("run rejected: {e}"))
    }

    /// Pause the loop and wait until it has acknowledged. When this returns
    /// `Ok`, no tick or entity update runs until `run`.
    pub fn stop(&self) -> Result<()> {
        let _transition = lock(&self.transition);
        self.control
            .request_pause()
            .inspect_err(|e| log::warn!("stop rejected: {e}"))
    }

    /// Stop the loop for good and join its thread. Idempotent.
    pub fn shutdown(&self) -> Result<()> {
        self.control.request_shutdown();
        let handle = lock(&self.handle).take();
        match handle {
            Some(handle) => handle
                .join()
                .map_err(|_| SimError::Thread("game loop thread panicked".into())),
            None => {
                // Never started: nothing to join.
                self.control.mark_stopped();
                Ok(())
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.control.state() == LoopState::Running
    }

    pub fn state(&self) -> LoopState {
        self.control.state()
    }

    /// Completed ticks since start.
    pub fn ticks(&self) -> u64 {
        self.shared.ticks()
    }

    pub fn latest_snapshot(&self) -> Option<WorldSnapshot> {
        self.shared.latest_snapshot()
    }

    /// Queue a command for the start of the next tick.
    pub fn send(&self, command: EngineCommand) -> Result<()> {
        if self.state() == LoopState::Stopped {
            return Err(SimError::InvalidState {
                action: "send",
                state: LoopState::Stopped,
            });
        }
        lock(&self.command_tx)
            .send(command)
            .map_err(|e| SimError::Thread(format!("failed to send command: {e}")))
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("game loop shutdown failed: {e}");
        }
    }
}

/// Marks the loop stopped however the thread exits.
struct StopOnExit<'a>(&'a LoopControl);

impl Drop for StopOnExit<'_> {
    fn drop(&mut self) {
        self.0.mark_stopped();
    }
}

/// The game loop. Runs until shutdown.
fn run_game_loop(
    parts: LoopParts,
    control: &LoopControl,
    shared: &SharedState,
    tick_duration: Duration,
) {
    let _stopped = StopOnExit(control);
    let LoopParts {
        mut game,
        mut host,
        commands,
    } = parts;
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Honor a pause requested between ticks
        if control.checkpoint() == Flow::Halt {
            return;
        }

        // 2. Drain all pending commands
        loop {
            match commands.try_recv() {
                Ok(EngineCommand::Spawn(blueprint)) => game.queue(WorldRequest::Spawn(blueprint)),
                Ok(EngineCommand::Despawn(id)) => game.queue(WorldRequest::Despawn(id)),
                Err(mpsc::TryRecvError::Empty) | Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }

        // 3. Advance one tick, pausing between entities if asked to
        let Some(snapshot) = game.tick_with(&mut || control.checkpoint()) else {
            return;
        };

        // 4. Hand the snapshot to the host
        if let Err(e) = host.render(&snapshot) {
            log::error!("render failed at tick {}: {e}", snapshot.time.tick);
        }

        // 5. Store latest snapshot for synchronous polling
        shared.publish(snapshot);

        // 6. Sleep until next tick
        next_tick_time += tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            if control.sleep_until(next_tick_time) == Flow::Halt {
                return;
            }
        } else if now - next_tick_time > tick_duration * 2 {
            // Too far behind — reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| {
        log::error!("game loop lock poisoned, recovering");
        e.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use smol_sim::config::SimConfig;

    use crate::host::NullHost;

    fn quiet_game(tick_rate: u32) -> GameState {
        GameState::new(SimConfig {
            tick_rate,
            spawn_enemies: false,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_tick_duration_follows_config() {
        let game_loop = GameLoop::new(quiet_game(50), Box::new(NullHost));
        assert!((game_loop.tick_duration.as_secs_f64() - 0.020).abs() < 1e-6);
    }

    #[test]
    fn test_run_before_start_is_invalid() {
        let game_loop = GameLoop::new(quiet_game(60), Box::new(NullHost));
        assert_eq!(game_loop.state(), LoopState::Created);
        assert_eq!(
            game_loop.run(),
            Err(SimError::InvalidState {
                action: "run",
                state: LoopState::Created
            })
        );
        assert!(game_loop.stop().is_err());
    }

    #[test]
    fn test_shutdown_without_start() {
        let game_loop = GameLoop::new(quiet_game(60), Box::new(NullHost));
        game_loop.shutdown().unwrap();
        assert_eq!(game_loop.state(), LoopState::Stopped);
        assert!(game_loop.start().is_err());
        assert_eq!(game_loop.ticks(), 0);
    }
}
