//! User directory: agent lookup and load bookkeeping.
//!
//! The lifecycle engine appoints the active user with the smallest running
//! average duration and shifts that average as tasks are taken and closed.
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
