//! Port contracts for closure statistics.

pub mod sink;

pub use sink::{StatisticsSink, StatisticsSinkError, StatisticsSinkResult};
