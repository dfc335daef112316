//! Knowledge-base catalog: cases and the clusters that group tickets.
//!
//! Clusters are created lazily the first time a task references an unseen
//! external index. Cases are reusable solutions that tasks may point at.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
