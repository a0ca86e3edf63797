//! Sprout listening API response types.
//!
//! Every endpoint wraps its payload in a `{"data": [...]}` envelope;
//! [`ApiResponse`] captures that pattern generically. Fields the bot does not
//! strictly need are optional so that partial records still deserialize.

use serde::{Deserialize, Deserializer};

/// Top-level `{"data": [...]}` envelope. A missing or `null` `data` is empty.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// One entry of `GET /metadata/client`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    #[serde(deserialize_with = "opaque_id")]
    pub customer_id: String,
    #[serde(default)]
    pub name: String,
}

/// A saved listening topic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Topic {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

// ---------------------------------------------------------------------------
// Listening messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub screen_name: Option<String>,
}

/// Engagement counters. The API reports shares as `shares_count`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentionMetrics {
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub replies: Option<u64>,
    #[serde(default, alias = "shares", deserialize_with = "lenient_count")]
    pub shares_count: Option<u64>,
}

/// A single listening message matched by a topic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mention {
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub from: Option<Author>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub perma_link: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub metrics: Option<MentionMetrics>,
    #[serde(default)]
    pub post_type: Option<String>,
}

impl Mention {
    #[must_use]
    pub fn likes(&self) -> Option<u64> {
        self.metrics.as_ref().and_then(|m| m.likes)
    }

    #[must_use]
    pub fn replies(&self) -> Option<u64> {
        self.metrics.as_ref().and_then(|m| m.replies)
    }

    #[must_use]
    pub fn shares(&self) -> Option<u64> {
        self.metrics.as_ref().and_then(|m| m.shares_count)
    }

    /// Likes + replies + shares, missing counts as zero.
    #[must_use]
    pub fn engagement(&self) -> u64 {
        mentionrelay_core::engagement_sum(self.likes(), self.replies(), self.shares())
    }
}

// ---------------------------------------------------------------------------
// Deserialization helpers
// ---------------------------------------------------------------------------

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ids are opaque: accept a JSON string or number and keep it as text.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Counters occasionally arrive as floats or `null`; negative values are dropped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn client_info_accepts_numeric_customer_id() {
        let info: ClientInfo =
            serde_json::from_value(json!({"customer_id": 2_684_547, "name": "Acme"})).unwrap();
        assert_eq!(info.customer_id, "2684547");
        assert_eq!(info.name, "Acme");
    }

    #[test]
    fn topic_accepts_string_id() {
        let topic: Topic = serde_json::from_value(json!({"id": "t-1", "name": "Brand"})).unwrap();
        assert_eq!(topic.id, "t-1");
    }

    #[test]
    fn topic_rejects_object_id() {
        let result = serde_json::from_value::<Topic>(json!({"id": {"x": 1}, "name": "Brand"}));
        assert!(result.is_err());
    }

    #[test]
    fn envelope_treats_null_data_as_empty() {
        let resp: ApiResponse<Topic> = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(resp.data.is_empty());
        let resp: ApiResponse<Topic> = serde_json::from_value(json!({})).unwrap();
        assert!(resp.data.is_empty());
    }

    #[test]
    fn envelope_decodes_any_record_type() {
        let topics: ApiResponse<Topic> =
            serde_json::from_value(json!({"data": [{"id": 7, "name": "Brand"}]})).unwrap();
        assert_eq!(topics.data[0].id, "7");

        let raw: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"data": [{"text": "a"}, 3]})).unwrap();
        assert_eq!(raw.data.len(), 2);
    }

    #[test]
    fn mention_with_only_text_deserializes() {
        let mention: Mention = serde_json::from_value(json!({"text": "hello"})).unwrap();
        assert_eq!(mention.text.as_deref(), Some("hello"));
        assert!(mention.hashtags.is_empty());
        assert_eq!(mention.engagement(), 0);
    }

    #[test]
    fn mention_engagement_sums_metrics() {
        let mention: Mention = serde_json::from_value(json!({
            "sentiment": "negative",
            "metrics": {"likes": 8, "replies": 5, "shares_count": 0}
        }))
        .unwrap();
        assert_eq!(mention.engagement(), 13);
    }

    #[test]
    fn metrics_tolerate_floats_nulls_and_negatives() {
        let metrics: MentionMetrics =
            serde_json::from_value(json!({"likes": 4.0, "replies": null, "shares_count": -2}))
                .unwrap();
        assert_eq!(metrics.likes, Some(4));
        assert_eq!(metrics.replies, None);
        assert_eq!(metrics.shares_count, None);
    }

    #[test]
    fn null_hashtags_become_empty() {
        let mention: Mention = serde_json::from_value(json!({"hashtags": null})).unwrap();
        assert!(mention.hashtags.is_empty());
    }
}
