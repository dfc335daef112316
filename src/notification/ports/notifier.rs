//! Notification port.

use crate::directory::domain::TelegramHandle;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification attempts.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Delivers "you were appointed" messages to an agent.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifies the agent behind `handle`.
    async fn notify(&self, handle: &TelegramHandle) -> NotifierResult<()>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The endpoint answered with a non-success status.
    #[error("notification endpoint rejected the request with status {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be delivered.
    #[error("notification transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
