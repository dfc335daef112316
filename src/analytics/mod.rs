//! Closure statistics: timing samples and their per-cluster summary.
//!
//! Every task that reaches `Closed` contributes one [`domain::TimingSample`].
//! The summary is recomputed from the full sample log after each append.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
