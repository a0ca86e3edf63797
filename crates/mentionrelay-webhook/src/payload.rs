//! Flattened, fixed-shape JSON payload sent for every mention.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use mentionrelay_core::{priority, Priority, Profile};
use mentionrelay_sprout::Mention;

/// Hashtags beyond this many are dropped from the payload.
pub const MAX_HASHTAGS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub topic_name: String,
    pub created_time: String,
    pub author_name: String,
    pub author_handle: String,
    pub network: String,
    pub message_text: String,
    pub sentiment: String,
    /// First [`MAX_HASHTAGS`] hashtags joined with `", "`.
    pub hashtags: String,
    pub likes: u64,
    pub replies: u64,
    pub shares: u64,
    pub permalink: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_type: Option<String>,
    pub webhook_timestamp: String,
    pub bot_version: String,
}

impl WebhookPayload {
    /// Flatten `mention` for `topic_name` under the active profile.
    #[must_use]
    pub fn from_mention(
        mention: &Mention,
        topic_name: &str,
        profile: &Profile,
        now: DateTime<Utc>,
    ) -> Self {
        let author = mention.from.as_ref();
        let sentiment = mention
            .sentiment
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        let priority = priority(&sentiment, mention.engagement(), &profile.thresholds);

        Self {
            topic_name: topic_name.to_string(),
            created_time: mention.created_time.clone().unwrap_or_default(),
            author_name: author
                .and_then(|a| a.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            author_handle: author
                .and_then(|a| a.screen_name.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            network: mention
                .network
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            message_text: truncate_chars(
                mention.text.as_deref().unwrap_or("No content"),
                profile.text_limit,
            )
            .to_string(),
            sentiment,
            hashtags: mention
                .hashtags
                .iter()
                .take(MAX_HASHTAGS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            likes: mention.likes().unwrap_or(0),
            replies: mention.replies().unwrap_or(0),
            shares: mention.shares().unwrap_or(0),
            permalink: mention.perma_link.clone().unwrap_or_default(),
            priority,
            post_type: mention.post_type.clone(),
            webhook_timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
            bot_version: profile.bot_version.clone(),
        }
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
/// Never splits a multi-byte character.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
