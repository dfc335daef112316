//! Adapter implementations for catalog repository ports.

pub mod memory;
pub mod postgres;
