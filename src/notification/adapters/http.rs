//! HTTP notifier posting to an external chat bot.

use crate::directory::domain::TelegramHandle;
use crate::notification::ports::{Notifier, NotifierError, NotifierResult};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct AppointmentPayload<'a> {
    username: &'a str,
}

/// Posts `{"username": <handle>}` as JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNotifier {
    /// Builds a notifier with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> NotifierResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotifierError::transport)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, handle: &TelegramHandle) -> NotifierResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AppointmentPayload {
                username: handle.as_str(),
            })
            .send()
            .await
            .map_err(NotifierError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifierError::Rejected {
                status: status.as_u16(),
            });
        }
        debug!(%handle, "appointment notification delivered");
        Ok(())
    }
}
