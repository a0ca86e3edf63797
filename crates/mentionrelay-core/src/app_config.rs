use std::path::PathBuf;

use crate::profile::Profile;

pub const DEFAULT_SPROUT_BASE_URL: &str = "https://api.sproutsocial.com/v1";

#[derive(Clone)]
pub struct AppConfig {
    pub sprout_api_token: String,
    pub webhook_url: String,
    pub sprout_base_url: String,
    pub profile: Profile,
    pub log_level: String,
    pub log_file: PathBuf,
    pub discovery_timeout_secs: u64,
    pub query_timeout_secs: u64,
    pub webhook_timeout_secs: u64,
    /// Seen-mention cache lifetime; `0` disables deduplication.
    pub dedup_ttl_secs: u64,
    pub dedup_capacity: usize,
}

impl AppConfig {
    #[must_use]
    pub fn dedup_enabled(&self) -> bool {
        self.dedup_ttl_secs > 0 && self.dedup_capacity > 0
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("sprout_api_token", &"[redacted]")
            .field("webhook_url", &"[redacted]")
            .field("sprout_base_url", &self.sprout_base_url)
            .field("profile", &self.profile.name)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("discovery_timeout_secs", &self.discovery_timeout_secs)
            .field("query_timeout_secs", &self.query_timeout_secs)
            .field("webhook_timeout_secs", &self.webhook_timeout_secs)
            .field("dedup_ttl_secs", &self.dedup_ttl_secs)
            .field("dedup_capacity", &self.dedup_capacity)
            .finish()
    }
}
