//! Bounded, time-evicted cache of mentions already forwarded.
//!
//! Successive lookback windows overlap, so the same mention can be returned
//! by more than one cycle. When enabled, the cache suppresses those repeats.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use mentionrelay_sprout::Mention;
use sha2::{Digest, Sha256};

pub type MentionKey = [u8; 32];

/// Stable identity for a mention: its `guid` when the API supplies one,
/// otherwise a digest of permalink, creation time, and text.
#[must_use]
pub fn mention_key(mention: &Mention) -> MentionKey {
    let mut hasher = Sha256::new();
    if let Some(guid) = mention.guid.as_deref().filter(|g| !g.is_empty()) {
        hasher.update(b"guid\0");
        hasher.update(guid.as_bytes());
    } else {
        for part in [&mention.perma_link, &mention.created_time, &mention.text] {
            hasher.update(part.as_deref().unwrap_or("").as_bytes());
            hasher.update(b"\0");
        }
    }
    hasher.finalize().into()
}

pub struct SeenCache {
    ttl: Duration,
    capacity: usize,
    keys: HashSet<MentionKey>,
    /// Insertion order; entries are never refreshed so this is also age order.
    order: VecDeque<(MentionKey, Instant)>,
}

impl SeenCache {
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            keys: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    /// `true` if `key` was recorded within the TTL ending at `now`.
    pub fn contains(&mut self, key: &MentionKey, now: Instant) -> bool {
        self.evict_expired(now);
        self.keys.contains(key)
    }

    /// Record `key` as forwarded at `now`, evicting the oldest entries once
    /// over capacity. Recording a key already present is a no-op.
    pub fn insert(&mut self, key: MentionKey, now: Instant) {
        self.evict_expired(now);
        if !self.keys.insert(key) {
            return;
        }
        self.order.push_back((key, now));
        while self.order.len() > self.capacity {
            if let Some((oldest, _)) = self.order.pop_front() {
                self.keys.remove(&oldest);
            }
        }
    }

    #[must_use]
    pub fn tracked(&self) -> usize {
        self.order.len()
    }

    fn evict_expired(&mut self, now: Instant) {
        while let Some((key, seen_at)) = self.order.front() {
            if now.saturating_duration_since(*seen_at) < self.ttl {
                break;
            }
            self.keys.remove(key);
            self.order.pop_front();
        }
    }
}
