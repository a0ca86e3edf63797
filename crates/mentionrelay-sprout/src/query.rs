//! Request body for the listening-messages endpoint.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use mentionrelay_core::{DateRangeStyle, Profile};

const BASE_FIELDS: &[&str] = &[
    "text",
    "from.name",
    "from.screen_name",
    "network",
    "perma_link",
    "created_time",
    "sentiment",
    "hashtags",
    "guid",
];

const METRICS: &[&str] = &["likes", "shares_count", "replies"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DAY_FORMAT: &str = "%Y-%m-%d";

/// JSON body of `POST /{customer}/listening/topics/{topic}/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageQuery {
    pub filters: Vec<String>,
    pub fields: Vec<String>,
    pub metrics: Vec<String>,
    pub limit: u32,
    pub sort: Vec<String>,
}

impl MessageQuery {
    /// Query for the newest mentions created in the profile's lookback window
    /// ending at `now`.
    #[must_use]
    pub fn for_window(profile: &Profile, now: DateTime<Utc>) -> Self {
        let mut filters = vec![created_time_filter(profile, now)];
        if !profile.networks.is_empty() {
            filters.push(format!("network.eq({})", profile.networks.join(",")));
        }

        let mut fields: Vec<String> = BASE_FIELDS.iter().map(ToString::to_string).collect();
        if !profile.post_types.is_empty() {
            filters.push(format!("post_type.eq({})", profile.post_types.join(",")));
            fields.push("post_type".to_string());
        }

        Self {
            filters,
            fields,
            metrics: METRICS.iter().map(ToString::to_string).collect(),
            limit: profile.page_size,
            sort: vec!["created_time:desc".to_string()],
        }
    }

    /// The `created_time` filter, for logging alongside a failed request.
    #[must_use]
    pub fn time_filter(&self) -> &str {
        self.filters.first().map_or("", String::as_str)
    }
}

/// Inclusive `created_time.in(start..end)` filter for the lookback window.
///
/// A window reaching past the earliest representable instant is clamped to it.
#[must_use]
pub fn created_time_filter(profile: &Profile, now: DateTime<Utc>) -> String {
    let start = Duration::try_hours(i64::from(profile.lookback_hours))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let end = now.format(TIMESTAMP_FORMAT);
    match profile.date_range {
        DateRangeStyle::Timestamp => {
            format!("created_time.in({}..{end})", start.format(TIMESTAMP_FORMAT))
        }
        DateRangeStyle::DayStart => {
            format!("created_time.in({}..{end})", start.format(DAY_FORMAT))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 30, 5).unwrap()
    }

    #[test]
    fn timestamp_style_renders_both_ends_in_full() {
        let filter = created_time_filter(&Profile::fixed(), noon());
        assert_eq!(
            filter,
            "created_time.in(2025-03-14T09:30:05..2025-03-14T12:30:05)"
        );
    }

    #[test]
    fn day_start_style_truncates_start_to_day() {
        let filter = created_time_filter(&Profile::final_corrected(), noon());
        assert_eq!(filter, "created_time.in(2025-03-14..2025-03-14T12:30:05)");
    }

    #[test]
    fn window_crossing_midnight_starts_on_previous_day() {
        let early = Utc.with_ymd_and_hms(2025, 3, 14, 1, 0, 0).unwrap();
        let filter = created_time_filter(&Profile::final_corrected(), early);
        assert_eq!(filter, "created_time.in(2025-03-13..2025-03-14T01:00:00)");
    }

    #[test]
    fn oversized_window_is_clamped_instead_of_panicking() {
        let profile = Profile {
            lookback_hours: u32::MAX,
            ..Profile::fixed()
        };
        let filter = created_time_filter(&profile, noon());
        assert!(filter.starts_with("created_time.in("));
        assert!(filter.ends_with("..2025-03-14T12:30:05)"));
    }

    #[test]
    fn fixed_profile_sends_only_time_filter() {
        let query = MessageQuery::for_window(&Profile::fixed(), noon());
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.time_filter(), query.filters[0]);
    }

    #[test]
    fn final_profile_adds_network_allow_list() {
        let query = MessageQuery::for_window(&Profile::final_corrected(), noon());
        assert_eq!(query.filters.len(), 2);
        assert_eq!(
            query.filters[1],
            "network.eq(TWITTER,INSTAGRAM,FACEBOOK,YOUTUBE,LINKEDIN,REDDIT,TUMBLR,WWW,TIKTOK)"
        );
        assert_eq!(query.limit, 25);
        assert!(!query.fields.iter().any(|f| f == "post_type"));
    }

    #[test]
    fn originals_profile_filters_and_requests_post_type() {
        let query = MessageQuery::for_window(&Profile::originals(), noon());
        assert_eq!(query.filters.len(), 3);
        assert!(query.filters[2].starts_with("post_type.eq(TWEET,"));
        assert!(query.fields.iter().any(|f| f == "post_type"));
    }

    #[test]
    fn body_serializes_with_expected_keys() {
        let query = MessageQuery::for_window(&Profile::final_corrected(), noon());
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["sort"], serde_json::json!(["created_time:desc"]));
        assert_eq!(
            body["metrics"],
            serde_json::json!(["likes", "shares_count", "replies"])
        );
        assert_eq!(body["limit"], 25);
        assert!(body["fields"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("from.screen_name")));
    }
}
