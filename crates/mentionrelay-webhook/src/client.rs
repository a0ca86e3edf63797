//! Single-attempt JSON sender for the automation webhook.

use std::time::Duration;

use reqwest::Client;

use crate::error::WebhookError;
use crate::payload::WebhookPayload;

/// Posts payloads to one fixed webhook URL. Fire-and-forget: there is no
/// retry, and the response body is ignored.
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    /// # Errors
    ///
    /// Returns [`WebhookError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("mentionrelay/0.1 (listening-relay)")
            .build()?;

        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    /// Sends one payload.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Http`] on network failure, timeout, or a
    /// non-2xx status.
    pub async fn send(&self, payload: &WebhookPayload) -> Result<(), WebhookError> {
        self.client
            .post(&self.url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
