//! In-memory catalog repositories for tests and local runs.

mod case;
mod cluster;

pub use case::InMemoryCaseRepository;
pub use cluster::InMemoryClusterRepository;
