//! Error type shared by every SMOL crate.

use thiserror::Error;

use crate::enums::LoopState;
use crate::types::EntityId;

/// Errors raised by the simulation core, the scheduler and the engine façade.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// An operation was called out of sequence (e.g. `stop()` while paused).
    #[error("cannot {action} while {state:?}")]
    InvalidState {
        action: &'static str,
        state: LoopState,
    },
    /// A component was bound to a second owner.
    #[error("component already bound to {0}")]
    AlreadyBound(EntityId),
    /// An input command of unrecognized shape or with unusable values.
    #[error("malformed command: {0}")]
    MalformedCommand(String),
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
    /// A graphic sink or render host failed.
    #[error("render failed: {0}")]
    Render(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The loop thread could not be spawned or died.
    #[error("loop thread: {0}")]
    Thread(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
