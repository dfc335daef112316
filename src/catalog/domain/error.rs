//! Error types for catalog domain validation.

use thiserror::Error;

/// Errors returned while constructing case and cluster values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogDomainError {
    /// The cluster name is empty after trimming.
    #[error("cluster name must not be empty")]
    EmptyClusterName,

    /// The case title is empty after trimming.
    #[error("case title must not be empty")]
    EmptyCaseTitle,
}
