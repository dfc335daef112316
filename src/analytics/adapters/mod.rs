//! Adapter implementations for the statistics sink port.

mod file;
mod memory;

pub use file::FileStatisticsSink;
pub use memory::InMemoryStatisticsSink;
