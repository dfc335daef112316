//! Support task lifecycle engine.
//!
//! Tasks move Open → InProgress → Closed. The engine resolves clusters
//! through the catalog, appoints the least-loaded agent through the
//! directory, records closure timings in the statistics sink and notifies
//! appointed agents. The module follows hexagonal architecture:
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
