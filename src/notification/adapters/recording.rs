//! Notifier that records handles instead of sending anything.

use crate::directory::domain::TelegramHandle;
use crate::notification::ports::{Notifier, NotifierError, NotifierResult};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory notifier for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    delivered: Vec<TelegramHandle>,
    failing: bool,
}

impl RecordingNotifier {
    /// Creates a notifier that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent notification fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .failing = failing;
    }

    /// Returns the handles notified so far, in order.
    #[must_use]
    pub fn handles(&self) -> Vec<TelegramHandle> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .delivered
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, handle: &TelegramHandle) -> NotifierResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| NotifierError::transport(std::io::Error::other(err.to_string())))?;
        if state.failing {
            return Err(NotifierError::Rejected { status: 503 });
        }
        state.delivered.push(handle.clone());
        Ok(())
    }
}
