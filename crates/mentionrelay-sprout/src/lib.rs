//! Client for the Sprout social-listening API.
//!
//! Covers the two discovery calls made once at startup (client metadata and
//! listening topics) and the per-topic message query made every cycle.

pub mod client;
pub mod error;
pub mod query;
pub mod types;

pub use client::SproutClient;
pub use error::SproutError;
pub use query::{created_time_filter, MessageQuery};
pub use types::{Author, ClientInfo, Mention, MentionMetrics, Topic};
