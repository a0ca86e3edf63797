use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    /// Network failure, timeout, or a non-2xx response from the webhook.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
