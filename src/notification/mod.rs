//! Appointment notifications.
//!
//! Delivery is best effort: the lifecycle engine logs failures and reports
//! them to the caller but never undoes an appointment because of them.

pub mod adapters;
pub mod ports;

#[cfg(test)]
mod tests;
