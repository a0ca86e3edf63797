//! HTTP client for the Sprout listening REST API.
//!
//! Wraps `reqwest` with bearer-token authentication, per-endpoint timeouts,
//! and typed response deserialization. Non-success statuses surface as
//! [`SproutError::UnexpectedStatus`] carrying a truncated body for logging.

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::SproutError;
use crate::query::MessageQuery;
use crate::types::{ApiResponse, ClientInfo, Mention, Topic};

/// Characters of an error response body kept for diagnostics.
const ERROR_BODY_LIMIT: usize = 300;

/// Client for the Sprout listening REST API.
///
/// Use [`SproutClient::new`] with the production base URL from config, or
/// point it at a wiremock server in tests.
pub struct SproutClient {
    client: Client,
    token: String,
    base_url: Url,
    discovery_timeout: Duration,
    query_timeout: Duration,
}

impl SproutClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// Discovery calls (client metadata, topics) use `discovery_timeout_secs`;
    /// message queries use the longer `query_timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`SproutError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SproutError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn new(
        token: &str,
        base_url: &str,
        discovery_timeout_secs: u64,
        query_timeout_secs: u64,
    ) -> Result<Self, SproutError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("mentionrelay/0.1 (listening-relay)")
            .build()?;

        let invalid = |reason: String| SproutError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("expected an absolute http(s) URL".to_string()));
        }

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url: parsed,
            discovery_timeout: Duration::from_secs(discovery_timeout_secs),
            query_timeout: Duration::from_secs(query_timeout_secs),
        })
    }

    /// Lists the client accounts visible to the token (`GET /metadata/client`).
    ///
    /// # Errors
    ///
    /// - [`SproutError::Http`] on network failure.
    /// - [`SproutError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SproutError::Deserialize`] if the response shape is unexpected.
    pub async fn get_client_metadata(&self) -> Result<Vec<ClientInfo>, SproutError> {
        let url = self.endpoint(&["metadata", "client"]);
        let request = self.authorized(self.client.get(url.clone()), self.discovery_timeout);
        let envelope: ApiResponse<ClientInfo> = Self::send_json(request, &url).await?;
        Ok(envelope.data)
    }

    /// Lists the listening topics for a customer
    /// (`GET /{customer}/metadata/customer/topics`).
    ///
    /// # Errors
    ///
    /// - [`SproutError::Http`] on network failure.
    /// - [`SproutError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SproutError::Deserialize`] if the response shape is unexpected.
    pub async fn get_topics(&self, customer_id: &str) -> Result<Vec<Topic>, SproutError> {
        let url = self.endpoint(&[customer_id, "metadata", "customer", "topics"]);
        let request = self.authorized(self.client.get(url.clone()), self.discovery_timeout);
        let envelope: ApiResponse<Topic> = Self::send_json(request, &url).await?;
        Ok(envelope.data)
    }

    /// Queries one page of listening messages for a topic
    /// (`POST /{customer}/listening/topics/{topic}/messages`).
    ///
    /// Individual records that fail to deserialize are skipped with a warning
    /// rather than failing the whole page.
    ///
    /// # Errors
    ///
    /// - [`SproutError::Http`] on network failure.
    /// - [`SproutError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SproutError::Deserialize`] if the envelope itself is malformed.
    pub async fn query_messages(
        &self,
        customer_id: &str,
        topic_id: &str,
        query: &MessageQuery,
    ) -> Result<Vec<Mention>, SproutError> {
        let url = self.endpoint(&[customer_id, "listening", "topics", topic_id, "messages"]);
        let request = self.authorized(self.client.post(url.clone()), self.query_timeout);
        let envelope: ApiResponse<serde_json::Value> =
            Self::send_json(request.json(query), &url).await?;

        let mentions = envelope
            .data
            .into_iter()
            .enumerate()
            .filter_map(|(idx, raw)| {
                serde_json::from_value::<Mention>(raw)
                    .map_err(|e| {
                        tracing::warn!(
                            topic_id,
                            index = idx,
                            error = %e,
                            "query_messages: skipping malformed mention"
                        );
                    })
                    .ok()
            })
            .collect();
        Ok(mentions)
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder, timeout: Duration) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/json")
            .timeout(timeout)
    }

    /// Sends a request, asserts a 2xx status, and parses the body as JSON.
    async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, SproutError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SproutError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.path().to_string(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SproutError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}
