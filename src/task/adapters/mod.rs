//! Adapter implementations for task ports.
//!
//! Besides the repository adapters, this module wires the catalog and
//! directory services into the engine's [`ClusterCatalog`] and
//! [`AgentDirectory`] ports.
//!
//! [`ClusterCatalog`]: crate::task::ports::ClusterCatalog
//! [`AgentDirectory`]: crate::task::ports::AgentDirectory

mod catalog;
mod directory;
pub mod memory;
pub mod postgres;
