//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod collaborators;
pub mod repository;

pub use collaborators::{AgentDirectory, ClusterCatalog};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
