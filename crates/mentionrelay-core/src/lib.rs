//! Shared configuration, product profiles, and priority scoring for mentionrelay.

pub mod app_config;
pub mod config;
pub mod priority;
pub mod profile;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use priority::{engagement_sum, priority, Priority, PriorityThresholds, URGENT_ENGAGEMENT};
pub use profile::{load_profile, parse_profile, DateRangeStyle, Profile, MAX_LOOKBACK_HOURS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("unknown profile '{0}' (expected one of: fixed, final, originals)")]
    UnknownProfile(String),

    #[error("failed to read profile file {path}: {source}")]
    ProfileFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile file: {0}")]
    ProfileFileParse(#[from] serde_yaml::Error),

    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}
