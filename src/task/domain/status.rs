//! Task lifecycle status.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status. Tasks only ever move forward, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created and waiting for an agent.
    Open,
    /// An agent is working on it.
    InProgress,
    /// Resolved. Terminal.
    Closed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }

    /// Returns the status reached by advancing one step, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Open => Some(Self::InProgress),
            Self::InProgress => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// Returns `true` when moving to `target` is a legal single step.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Returns `true` for the terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
