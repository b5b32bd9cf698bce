//! Movement commands produced by input sources.
//!
//! A command is consumed once per tick by a physics component. Commands that
//! cross a serialization boundary are validated before they reach physics.

use serde::{Deserialize, Serialize};

use crate::enums::Direction;
use crate::error::{Result, SimError};
use crate::types::Point;

/// A single movement directive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MovementCommand {
    /// Move one step of `movement_speed` in a fixed direction.
    Direction { direction: Direction },
    /// Approach an absolute point, at most `movement_speed` per tick.
    MoveTo { target: Point },
}

impl MovementCommand {
    pub fn direction(direction: Direction) -> Self {
        MovementCommand::Direction { direction }
    }

    pub fn move_to(target: Point) -> Self {
        MovementCommand::MoveTo { target }
    }

    /// Parse a command from its JSON form, as found in scripted input files.
    /// Any unrecognized shape is a `MalformedCommand`.
    pub fn from_json(json: &str) -> Result<Self> {
        let command: MovementCommand = serde_json::from_str(json)
            .map_err(|e| SimError::MalformedCommand(e.to_string()))?;
        command.validate()?;
        Ok(command)
    }

    /// Reject commands physics cannot act on (non-finite targets).
    pub fn validate(&self) -> Result<()> {
        match self {
            MovementCommand::Direction { .. } => Ok(()),
            MovementCommand::MoveTo { target } => {
                if target.is_finite() {
                    Ok(())
                } else {
                    Err(SimError::MalformedCommand(format!(
                        "move target is not finite: ({}, {})",
                        target.x, target.y
                    )))
                }
            }
        }
    }
}
