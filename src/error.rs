//! Stable error taxonomy shared by every service in the crate.
//!
//! Each service error enum keeps its full context (operation name, source
//! error) for diagnostics, and classifies itself into one [`ErrorKind`] so
//! that callers such as a protocol layer can map failures onto a small,
//! stable set of outcomes.

use std::fmt;

/// Caller-facing classification of service failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The referenced entity does not exist.
    NotFound,
    /// The requested lifecycle transition is not allowed.
    InvalidState,
    /// The task already has an assignee.
    AlreadyAssigned,
    /// A unique constraint was violated.
    Duplicate,
    /// A required collaborator (storage, statistics, catalog) failed.
    Dependency,
    /// No active user is available for appointment.
    NoEligibleUser,
    /// Caller-supplied values failed validation.
    InvalidInput,
}

impl ErrorKind {
    /// Returns the canonical snake-case name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
            Self::AlreadyAssigned => "already_assigned",
            Self::Duplicate => "duplicate",
            Self::Dependency => "dependency",
            Self::NoEligibleUser => "no_eligible_user",
            Self::InvalidInput => "invalid_input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
