//! Error types for directory domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating user records.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DirectoryDomainError {
    /// The email address is empty after trimming.
    #[error("email must not be empty")]
    EmptyEmail,

    /// The telegram handle is empty after trimming.
    #[error("telegram handle must not be empty")]
    EmptyTelegramHandle,

    /// Running averages must be finite.
    #[error("average duration must be finite, got {0}")]
    NonFiniteAverage(f64),
}

/// Error returned while parsing user roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseUserRoleError(pub String);

/// Error returned while parsing user statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user status: {0}")]
pub struct ParseUserStatusError(pub String);

/// Error returned while parsing ledger change kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown load change kind: {0}")]
pub struct ParseLoadChangeError(pub String);
