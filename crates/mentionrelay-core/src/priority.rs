//! Mention priority derived from sentiment and engagement.

use serde::{Deserialize, Serialize};

/// Negative mentions with more engagement than this are always `URGENT`,
/// whatever thresholds the active profile uses.
pub const URGENT_ENGAGEMENT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "LOW"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::High => write!(f, "HIGH"),
            Priority::Urgent => write!(f, "URGENT"),
        }
    }
}

/// Engagement cut-offs for non-urgent priorities. Both bounds are exclusive:
/// a sum must be strictly greater than `high` to be `HIGH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityThresholds {
    pub high: u64,
    pub mid: u64,
}

/// Sum of likes, replies, and shares. Missing counts are zero.
#[must_use]
pub fn engagement_sum(likes: Option<u64>, replies: Option<u64>, shares: Option<u64>) -> u64 {
    [likes, replies, shares]
        .into_iter()
        .map(|v| v.unwrap_or(0))
        .fold(0u64, u64::saturating_add)
}

/// Score a mention.
///
/// Precedence, first match wins:
///
/// | condition                                   | result   |
/// |---------------------------------------------|----------|
/// | negative and engagement > 10                | `URGENT` |
/// | negative                                    | `HIGH`   |
/// | engagement > `thresholds.high`              | `HIGH`   |
/// | engagement > `thresholds.mid`               | `MEDIUM` |
/// | otherwise                                   | `LOW`    |
#[must_use]
pub fn priority(sentiment: &str, engagement: u64, thresholds: &PriorityThresholds) -> Priority {
    let negative = sentiment.eq_ignore_ascii_case("negative");

    if negative && engagement > URGENT_ENGAGEMENT {
        Priority::Urgent
    } else if negative || engagement > thresholds.high {
        Priority::High
    } else if engagement > thresholds.mid {
        Priority::Medium
    } else {
        Priority::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FINAL: PriorityThresholds = PriorityThresholds { high: 50, mid: 10 };
    const FIXED: PriorityThresholds = PriorityThresholds { high: 25, mid: 5 };

    #[test]
    fn negative_with_engagement_above_ten_is_urgent() {
        let engagement = engagement_sum(Some(8), Some(5), Some(0));
        assert_eq!(engagement, 13);
        assert_eq!(priority("negative", engagement, &FINAL), Priority::Urgent);
        assert_eq!(priority("negative", engagement, &FIXED), Priority::Urgent);
    }

    #[test]
    fn urgent_ignores_profile_thresholds() {
        let huge = PriorityThresholds { high: 1_000, mid: 500 };
        assert_eq!(priority("negative", 11, &huge), Priority::Urgent);
    }

    #[test]
    fn negative_at_ten_is_high_not_urgent() {
        assert_eq!(priority("negative", 10, &FINAL), Priority::High);
        assert_eq!(priority("negative", 0, &FINAL), Priority::High);
    }

    #[test]
    fn sentiment_match_is_case_insensitive() {
        assert_eq!(priority("NEGATIVE", 20, &FINAL), Priority::Urgent);
        assert_eq!(priority("Negative", 0, &FINAL), Priority::High);
    }

    #[test]
    fn engagement_above_high_threshold_is_high() {
        assert_eq!(priority("positive", 51, &FINAL), Priority::High);
        assert_eq!(priority("positive", 50, &FINAL), Priority::Medium);
        assert_eq!(priority("neutral", 26, &FIXED), Priority::High);
    }

    #[test]
    fn engagement_above_mid_threshold_is_medium() {
        assert_eq!(priority("neutral", 11, &FINAL), Priority::Medium);
        assert_eq!(priority("neutral", 6, &FIXED), Priority::Medium);
    }

    #[test]
    fn non_negative_at_or_below_mid_is_always_low() {
        for sentiment in ["positive", "neutral", "unknown", ""] {
            for engagement in 0..=FINAL.mid {
                assert_eq!(priority(sentiment, engagement, &FINAL), Priority::Low);
            }
            for engagement in 0..=FIXED.mid {
                assert_eq!(priority(sentiment, engagement, &FIXED), Priority::Low);
            }
        }
    }

    #[test]
    fn missing_metrics_count_as_zero() {
        assert_eq!(engagement_sum(None, None, None), 0);
        assert_eq!(engagement_sum(Some(3), None, Some(4)), 7);
    }

    #[test]
    fn engagement_sum_saturates() {
        assert_eq!(engagement_sum(Some(u64::MAX), Some(1), None), u64::MAX);
    }

    #[test]
    fn priority_serializes_uppercase() {
        let json = serde_json::to_string(&Priority::Urgent).unwrap();
        assert_eq!(json, "\"URGENT\"");
        assert_eq!(Priority::Medium.to_string(), "MEDIUM");
    }
}
