use std::path::{Path, PathBuf};

use crate::app_config::{AppConfig, DEFAULT_SPROUT_BASE_URL};
use crate::profile::{load_profile, Profile};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing, values are invalid,
/// or the selected profile cannot be resolved.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing, values are invalid,
/// or the selected profile cannot be resolved.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key), load_profile)
}

/// Build application configuration from an env-var lookup and a profile loader.
///
/// Both are injected so tests can use a plain `HashMap` and never touch the
/// filesystem or the process environment.
fn build_app_config<F, L>(lookup: F, load_profile_file: L) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    L: Fn(&Path) -> Result<Profile, ConfigError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let sprout_api_token = require("SPROUT_API_TOKEN")?;
    let webhook_url = require("ZAPIER_WEBHOOK_URL")?;
    if !webhook_url.starts_with("http://") && !webhook_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "ZAPIER_WEBHOOK_URL".to_string(),
            reason: "must be an http(s) URL".to_string(),
        });
    }

    let sprout_base_url = or_default("SPROUT_BASE_URL", DEFAULT_SPROUT_BASE_URL);

    let profile = match lookup("MENTIONRELAY_PROFILE_PATH") {
        Ok(path) if !path.trim().is_empty() => load_profile_file(Path::new(&path))?,
        _ => Profile::preset(&or_default("MENTIONRELAY_PROFILE", "final"))?,
    };

    let log_level = or_default("MENTIONRELAY_LOG_LEVEL", "info");
    let log_file = PathBuf::from(or_default("MENTIONRELAY_LOG_FILE", "sprout_bot.log"));

    let discovery_timeout_secs = parse_u64("SPROUT_DISCOVERY_TIMEOUT_SECS", "30")?;
    let query_timeout_secs = parse_u64("SPROUT_QUERY_TIMEOUT_SECS", "60")?;
    let webhook_timeout_secs = parse_u64("WEBHOOK_TIMEOUT_SECS", "30")?;

    let dedup_ttl_secs = parse_u64("MENTIONRELAY_DEDUP_TTL_SECS", "0")?;
    let dedup_capacity = parse_usize("MENTIONRELAY_DEDUP_CAPACITY", "5000")?;

    Ok(AppConfig {
        sprout_api_token,
        webhook_url,
        sprout_base_url,
        profile,
        log_level,
        log_file,
        discovery_timeout_secs,
        query_timeout_secs,
        webhook_timeout_secs,
        dedup_ttl_secs,
        dedup_capacity,
    })
}
