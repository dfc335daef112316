//! Port contracts for appointment notifications.

pub mod notifier;

pub use notifier::{Notifier, NotifierError, NotifierResult};
