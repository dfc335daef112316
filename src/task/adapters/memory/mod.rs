//! In-memory task repository for tests and local runs.

mod task;

pub use task::InMemoryTaskRepository;
