//! Product profiles.
//!
//! The bot shipped as several variants that disagree on lookback window, page
//! size, filter syntax, delays, and priority thresholds. Each variant is a
//! named [`Profile`]; a deployment picks one by name or loads its own from YAML.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::priority::PriorityThresholds;
use crate::ConfigError;

/// Every network the listening API accepts in a `network.eq(...)` filter.
const ALL_NETWORKS: &[&str] = &[
    "TWITTER",
    "INSTAGRAM",
    "FACEBOOK",
    "YOUTUBE",
    "LINKEDIN",
    "REDDIT",
    "TUMBLR",
    "WWW",
    "TIKTOK",
];

/// Longest lookback window a profile may request (one year).
pub const MAX_LOOKBACK_HOURS: u32 = 24 * 365;

/// Post types that represent an original post rather than a reply or comment.
const ORIGINAL_POST_TYPES: &[&str] = &[
    "TWEET",
    "QUOTE_TWEET",
    "INSTAGRAM_MEDIA",
    "FACEBOOK_POST",
    "LINKEDIN_POST",
    "YOUTUBE_VIDEO",
    "REDDIT_POST",
    "TUMBLR_POST",
    "TIKTOK_POST",
    "WEB_ARTICLE",
];

/// How the inclusive `created_time.in(a..b)` range is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangeStyle {
    /// `2024-05-01T09:00:00..2024-05-01T12:00:00`
    Timestamp,
    /// `2024-05-01..2024-05-01T12:00:00`: start truncated to its calendar day.
    DayStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub lookback_hours: u32,
    pub page_size: u32,
    /// Maximum number of characters of mention text forwarded.
    pub text_limit: usize,
    pub thresholds: PriorityThresholds,
    pub date_range: DateRangeStyle,
    /// Empty means no network filter is sent.
    #[serde(default)]
    pub networks: Vec<String>,
    /// Empty means no post-type filter is sent.
    #[serde(default)]
    pub post_types: Vec<String>,
    pub send_delay_ms: u64,
    pub topic_delay_ms: u64,
    pub cycle_interval_secs: u64,
    pub retry_interval_secs: u64,
    pub bot_version: String,
}

impl Profile {
    /// Look up a built-in profile by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProfile`] for any name other than
    /// `fixed`, `final`, or `originals`.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "fixed" => Ok(Self::fixed()),
            "final" => Ok(Self::final_corrected()),
            "originals" => Ok(Self::originals()),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }

    /// The first cloud variant: full-timestamp range, no allow-lists,
    /// small pages, lower thresholds.
    #[must_use]
    pub fn fixed() -> Self {
        Self {
            name: "fixed".to_string(),
            lookback_hours: 3,
            page_size: 10,
            text_limit: 400,
            thresholds: PriorityThresholds { high: 25, mid: 5 },
            date_range: DateRangeStyle::Timestamp,
            networks: Vec::new(),
            post_types: Vec::new(),
            send_delay_ms: 2_000,
            topic_delay_ms: 1_000,
            cycle_interval_secs: 3 * 60 * 60,
            retry_interval_secs: 5 * 60,
            bot_version: "cloud-v1.1-fixed".to_string(),
        }
    }

    /// The corrected variant: day-start range syntax plus the required
    /// network allow-list.
    #[must_use]
    pub fn final_corrected() -> Self {
        Self {
            name: "final".to_string(),
            lookback_hours: 3,
            page_size: 25,
            text_limit: 500,
            thresholds: PriorityThresholds { high: 50, mid: 10 },
            date_range: DateRangeStyle::DayStart,
            networks: ALL_NETWORKS.iter().map(ToString::to_string).collect(),
            post_types: Vec::new(),
            send_delay_ms: 2_000,
            topic_delay_ms: 1_000,
            cycle_interval_secs: 3 * 60 * 60,
            retry_interval_secs: 10 * 60,
            bot_version: "cloud-v3.0-final-corrected".to_string(),
        }
    }

    /// `final` restricted to original posts (no replies or comments).
    #[must_use]
    pub fn originals() -> Self {
        Self {
            name: "originals".to_string(),
            post_types: ORIGINAL_POST_TYPES.iter().map(ToString::to_string).collect(),
            bot_version: "cloud-v3.1-originals".to_string(),
            ..Self::final_corrected()
        }
    }

    #[must_use]
    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }

    #[must_use]
    pub fn topic_delay(&self) -> Duration {
        Duration::from_millis(self.topic_delay_ms)
    }

    #[must_use]
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    /// Check the invariants the rest of the bot relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProfile`] naming the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::InvalidProfile(format!("{}: {msg}", self.name)));

        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidProfile("name must not be empty".to_string()));
        }
        if self.lookback_hours == 0 {
            return invalid("lookback_hours must be greater than 0");
        }
        if self.lookback_hours > MAX_LOOKBACK_HOURS {
            return invalid("lookback_hours must not exceed one year (8760)");
        }
        if self.page_size == 0 {
            return invalid("page_size must be greater than 0");
        }
        if self.text_limit == 0 {
            return invalid("text_limit must be greater than 0");
        }
        if self.thresholds.mid > self.thresholds.high {
            return invalid("thresholds.mid must not exceed thresholds.high");
        }
        if self.cycle_interval_secs == 0 {
            return invalid("cycle_interval_secs must be greater than 0");
        }
        if self.retry_interval_secs == 0 {
            return invalid("retry_interval_secs must be greater than 0");
        }
        Ok(())
    }
}

/// Parse and validate a YAML profile document.
///
/// # Errors
///
/// Returns [`ConfigError::ProfileFileParse`] for malformed YAML and
/// [`ConfigError::InvalidProfile`] if validation fails.
pub fn parse_profile(content: &str) -> Result<Profile, ConfigError> {
    let profile: Profile = serde_yaml::from_str(content)?;
    profile.validate()?;
    Ok(profile)
}

/// Load and validate a profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profile(path: &Path) -> Result<Profile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_profile(&content)
}
