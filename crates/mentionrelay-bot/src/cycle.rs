//! One monitoring cycle: fetch every topic's recent mentions and forward
//! each one to the webhook.
//!
//! Every request here is a soft failure. A failed fetch yields no mentions and
//! a failed send is dropped; neither stops the cycle.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use mentionrelay_core::Profile;
use mentionrelay_sprout::{Mention, MessageQuery, SproutClient, SproutError, Topic};
use mentionrelay_webhook::{WebhookClient, WebhookPayload};

use crate::bootstrap::Session;
use crate::dedup::{mention_key, SeenCache};

/// Everything a cycle needs, fixed after bootstrap.
pub struct Relay {
    pub sprout: SproutClient,
    pub webhook: WebhookClient,
    pub profile: Profile,
    pub session: Session,
    seen: Option<Mutex<SeenCache>>,
}

impl Relay {
    #[must_use]
    pub fn new(
        sprout: SproutClient,
        webhook: WebhookClient,
        profile: Profile,
        session: Session,
    ) -> Self {
        Self {
            sprout,
            webhook,
            profile,
            session,
            seen: None,
        }
    }

    /// Suppress mentions already forwarded within `ttl`.
    #[must_use]
    pub fn with_dedup(mut self, ttl: Duration, capacity: usize) -> Self {
        self.seen = Some(Mutex::new(SeenCache::new(ttl, capacity)));
        self
    }

    /// `true` if dedup is enabled and this mention was already forwarded.
    fn already_forwarded(&self, mention: &Mention) -> bool {
        let Some(seen) = &self.seen else {
            return false;
        };
        // A panicked cycle cannot leave the cache half-updated, so a poisoned
        // lock is still safe to use.
        let mut cache = seen.lock().unwrap_or_else(PoisonError::into_inner);
        cache.contains(&mention_key(mention), Instant::now())
    }

    /// Record a successful forward. Failed sends are never recorded so the
    /// next overlapping window retries them.
    fn mark_forwarded(&self, mention: &Mention) {
        if let Some(seen) = &self.seen {
            let mut cache = seen.lock().unwrap_or_else(PoisonError::into_inner);
            cache.insert(mention_key(mention), Instant::now());
        }
    }

    fn tracked(&self) -> Option<usize> {
        self.seen.as_ref().map(|seen| {
            seen.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .tracked()
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub topics: usize,
    pub fetched: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Run one full pass over every topic, in bootstrap order.
///
/// Each forward attempt is followed by the profile's send delay and each
/// topic by its topic delay.
pub async fn run_cycle(relay: &Relay, cycle: u64) -> CycleReport {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("cycle", cycle, %run_id);

    async move {
        tracing::info!(
            started_at = %Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            topics = relay.session.topics.len(),
            "starting monitoring cycle"
        );

        let mut report = CycleReport::default();
        let total = relay.session.topics.len();

        for (idx, topic) in relay.session.topics.iter().enumerate() {
            tracing::info!(position = idx + 1, total, topic = %topic.name, "processing topic");

            let query = MessageQuery::for_window(&relay.profile, Utc::now());
            let mentions = fetch_topic_mentions(
                &relay.sprout,
                &relay.session.customer_id,
                topic,
                &query,
            )
            .await;
            report.topics += 1;
            report.fetched += mentions.len();

            for mention in &mentions {
                if relay.already_forwarded(mention) {
                    report.skipped += 1;
                    continue;
                }
                if forward_mention(&relay.webhook, mention, &topic.name, &relay.profile).await {
                    relay.mark_forwarded(mention);
                    report.sent += 1;
                } else {
                    report.failed += 1;
                }
                tokio::time::sleep(relay.profile.send_delay()).await;
            }

            tokio::time::sleep(relay.profile.topic_delay()).await;
        }

        tracing::info!(
            topics = report.topics,
            fetched = report.fetched,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            dedup_tracked = ?relay.tracked(),
            "monitoring cycle complete"
        );
        report
    }
    .instrument(span)
    .await
}

/// Fetch a topic's mentions for the current window.
///
/// Never fails: any error, including a non-success status, is logged and
/// treated as an empty page.
pub async fn fetch_topic_mentions(
    client: &SproutClient,
    customer_id: &str,
    topic: &Topic,
    query: &MessageQuery,
) -> Vec<Mention> {
    match client.query_messages(customer_id, &topic.id, query).await {
        Ok(mentions) => {
            if mentions.is_empty() {
                tracing::info!(topic = %topic.name, "no mentions found");
            } else {
                tracing::info!(topic = %topic.name, count = mentions.len(), "found mentions");
            }
            mentions
        }
        Err(SproutError::UnexpectedStatus { status, body, .. }) => {
            tracing::error!(
                topic = %topic.name,
                status,
                response = %body,
                filter = query.time_filter(),
                "listening query rejected"
            );
            Vec::new()
        }
        Err(e) => {
            tracing::error!(topic = %topic.name, error = %e, "listening query failed");
            Vec::new()
        }
    }
}

/// Flatten and send one mention. Returns `false` if the send failed; the
/// mention is not retried.
pub async fn forward_mention(
    webhook: &WebhookClient,
    mention: &Mention,
    topic_name: &str,
    profile: &Profile,
) -> bool {
    let payload = WebhookPayload::from_mention(mention, topic_name, profile, Utc::now());
    match webhook.send(&payload).await {
        Ok(()) => {
            tracing::info!(
                author = %payload.author_handle,
                priority = %payload.priority,
                "forwarded mention"
            );
            true
        }
        Err(e) => {
            tracing::error!(
                author = %payload.author_handle,
                error = %e,
                "failed to forward mention"
            );
            false
        }
    }
}
