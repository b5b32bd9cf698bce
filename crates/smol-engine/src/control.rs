//! Pause/resume monitor shared by the loop thread and its controllers.
//!
//! Controllers only record intent. The loop thread is the only party that
//! moves `Running -> Paused`, and it does so at a checkpoint, so a caller of
//! `request_pause` knows that no entity update is in flight once it returns.
//! Every wait is a predicate loop, so spurious wake-ups are harmless.

use std::sync::{Condvar, LockResult, Mutex, MutexGuard};
use std::time::Instant;

use smol_core::enums::LoopState;
use smol_core::error::{Result, SimError};
use smol_sim::world::Flow;

#[derive(Debug, Default)]
struct ControlState {
    state: LoopState,
    pause_requested: bool,
    shutdown_requested: bool,
}

#[derive(Debug, Default)]
pub struct LoopControl {
    inner: Mutex<ControlState>,
    changed: Condvar,
}

impl LoopControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoopState {
        self.lock().state
    }

    /// `Created -> Running`, before the loop thread is spawned.
    pub fn begin(&self) -> Result<()> {
        let mut guard = self.lock();
        if guard.state != LoopState::Created {
            return Err(SimError::InvalidState {
                action: "start",
                state: guard.state,
            });
        }
        guard.state = LoopState::Running;
        Ok(())
    }

    /// Ask the loop to pause and block until it has acknowledged.
    pub fn request_pause(&self) -> Result<()> {
        let mut guard = self.lock();
        if guard.state != LoopState::Running {
            return Err(SimError::InvalidState {
                action: "stop",
                state: guard.state,
            });
        }
        guard.pause_requested = true;
        self.changed.notify_all();

        let guard = recover(
            self.changed
                .wait_while(guard, |s| s.state == LoopState::Running),
        );
        match guard.state {
            LoopState::Paused => Ok(()),
            // The loop went away while we waited.
            state => Err(SimError::InvalidState {
                action: "stop",
                state,
            }),
        }
    }

    /// `Paused -> Running`. Wakes the parked loop thread.
    pub fn resume(&self) -> Result<()> {
        let mut guard = self.lock();
        if guard.state != LoopState::Paused {
            return Err(SimError::InvalidState {
                action: "run",
                state: guard.state,
            });
        }
        guard.state = LoopState::Running;
        guard.pause_requested = false;
        self.changed.notify_all();
        log::info!("game loop resumed");
        Ok(())
    }

    /// Ask the loop to exit. Wakes it if it is parked or sleeping.
    pub fn request_shutdown(&self) {
        let mut guard = self.lock();
        guard.shutdown_requested = true;
        self.changed.notify_all();
    }

    /// Terminal. Called by the loop thread on its way out, and for loops
    /// that never started.
    pub fn mark_stopped(&self) {
        let mut guard = self.lock();
        if guard.state != LoopState::Stopped {
            guard.state = LoopState::Stopped;
            log::info!("game loop stopped");
        }
        self.changed.notify_all();
    }

    /// Loop-thread side: honor a pending pause, then block while paused.
    /// `Halt` once shutdown has been requested.
    pub fn checkpoint(&self) -> Flow {
        let guard = self.lock();
        let guard = self.park_if_requested(guard);
        if guard.shutdown_requested {
            Flow::Halt
        } else {
            Flow::Continue
        }
    }

    /// Loop-thread side: sleep until `deadline`. Wakes early for a pause
    /// (which is honored before returning) or a shutdown.
    pub fn sleep_until(&self, deadline: Instant) -> Flow {
        let guard = self.lock();
        let timeout = deadline.saturating_duration_since(Instant::now());
        let (guard, _) = recover(self.changed.wait_timeout_while(guard, timeout, |s| {
            !s.shutdown_requested && !s.pause_requested
        }));
        let guard = self.park_if_requested(guard);
        if guard.shutdown_requested {
            Flow::Halt
        } else {
            Flow::Continue
        }
    }

    fn park_if_requested<'a>(
        &self,
        mut guard: MutexGuard<'a, ControlState>,
    ) -> MutexGuard<'a, ControlState> {
        if guard.pause_requested && !guard.shutdown_requested && guard.state == LoopState::Running
        {
            guard.state = LoopState::Paused;
            guard.pause_requested = false;
            self.changed.notify_all();
            log::info!("game loop paused");
        }
        recover(self.changed.wait_while(guard, |s| {
            s.state == LoopState::Paused && !s.shutdown_requested
        }))
    }

    fn lock(&self) -> MutexGuard<'_, ControlState> {
        recover(self.inner.lock())
    }
}

fn recover<T>(result: LockResult<T>) -> T {
    result.unwrap_or_else(|e| {
        log::error!("loop control lock poisoned, recovering");
        e.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn pause_before_start_is_invalid() {
        let control = LoopControl::new();
        assert_eq!(
            control.request_pause(),
            Err(SimError::InvalidState {
                action: "stop",
                state: LoopState::Created
            })
        );
        assert!(control.resume().is_err());
    }

    #[test]
    fn begin_only_once() {
        let control = LoopControl::new();
        control.begin().unwrap();
        assert_eq!(control.state(), LoopState::Running);
        assert_eq!(
            control.begin(),
            Err(SimError::InvalidState {
                action: "start",
                state: LoopState::Running
            })
        );
    }

    #[test]
    fn pause_waits_for_checkpoint() {
        let control = Arc::new(LoopControl::new());
        control.begin().unwrap();

        let looper = Arc::clone(&control);
        let handle = thread::spawn(move || {
            while looper.checkpoint() == Flow::Continue {
                thread::sleep(Duration::from_millis(1));
            }
        });

        control.request_pause().unwrap();
        assert_eq!(control.state(), LoopState::Paused);

        control.resume().unwrap();
        assert_eq!(control.state(), LoopState::Running);

        control.request_shutdown();
        handle.join().unwrap();
    }

    #[test]
    fn shutdown_wakes_paused_loop() {
        let control = Arc::new(LoopControl::new());
        control.begin().unwrap();

        let looper = Arc::clone(&control);
        let handle = thread::spawn(move || {
            while looper.checkpoint() == Flow::Continue {
                thread::sleep(Duration::from_millis(1));
            }
            looper.mark_stopped();
        });

        control.request_pause().unwrap();
        control.request_shutdown();
        handle.join().unwrap();
        assert_eq!(control.state(), LoopState::Stopped);
    }

    #[test]
    fn sleep_returns_at_deadline() {
        let control = LoopControl::new();
        control.begin().unwrap();
        let start = Instant::now();
        let flow = control.sleep_until(start + Duration::from_millis(5));
        assert_eq!(flow, Flow::Continue);
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn sleep_cut_short_by_shutdown() {
        let control = LoopControl::new();
        control.begin().unwrap();
        control.request_shutdown();
        let start = Instant::now();
        let flow = control.sleep_until(start + Duration::from_secs(10));
        assert_eq!(flow, Flow::Halt);
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
