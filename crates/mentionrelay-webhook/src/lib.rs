//! Downstream automation webhook: the flattened mention payload and a
//! single-attempt sender.

pub mod client;
pub mod error;
pub mod payload;

pub use client::WebhookClient;
pub use error::WebhookError;
pub use payload::{truncate_chars, WebhookPayload, MAX_HASHTAGS};
