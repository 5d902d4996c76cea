use std::collections::BTreeSet;
use std::time::Duration;

use crate::app_config::AppConfig;
use crate::pipeline_config::{DelayRange, PipelineConfig};
use crate::tags::normalize_tag;
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials and `DATABASE_URL` are optional here; each subcommand asks for
/// the ones it needs via [`AppConfig::credentials`] and
/// [`AppConfig::require_database_url`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let headless_raw = or_default("TAGPULSE_HEADLESS", "false");
    let headless = parse_bool(&headless_raw)
        .ok_or_else(|| invalid("TAGPULSE_HEADLESS", format!("not a boolean: {headless_raw}")))?;

    let pacing_min = parse_u64("TAGPULSE_PACING_MIN_SECS", "8")?;
    let pacing_max = parse_u64("TAGPULSE_PACING_MAX_SECS", "12")?;
    if pacing_min > pacing_max {
        return Err(invalid(
            "TAGPULSE_PACING_MIN_SECS",
            format!("{pacing_min} exceeds TAGPULSE_PACING_MAX_SECS ({pacing_max})"),
        ));
    }

    let db_min_connections = parse_u32("TAGPULSE_DB_MIN_CONNECTIONS", "1")?;
    let db_max_connections = parse_u32("TAGPULSE_DB_MAX_CONNECTIONS", "5")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "TAGPULSE_DB_MIN_CONNECTIONS",
            format!("{db_min_connections} exceeds TAGPULSE_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }

    let mut pipeline = PipelineConfig {
        tags_per_run: parse_positive_usize("TAGPULSE_TAGS_PER_RUN", "15")?,
        posts_per_tag: parse_positive_usize("TAGPULSE_POSTS_PER_TAG", "5")?,
        min_frequency: parse_u64("TAGPULSE_MIN_FREQUENCY", "1")?,
        pacing: DelayRange::from_secs(pacing_min, pacing_max),
        element_timeout: Duration::from_millis(parse_u64("TAGPULSE_ELEMENT_TIMEOUT_MS", "10000")?),
        ..PipelineConfig::default()
    };
    if let Ok(raw) = lookup("TAGPULSE_EXCLUDED_TAGS") {
        pipeline.excluded_tags = parse_tag_list(&raw);
    }

    Ok(AppConfig {
        database_url: optional("DATABASE_URL"),
        instagram_username: optional("INSTAGRAM_USERNAME"),
        instagram_password: optional("INSTAGRAM_PASSWORD"),
        log_level: or_default("TAGPULSE_LOG_LEVEL", "info"),
        headless,
        user_agent: or_default("TAGPULSE_USER_AGENT", DEFAULT_USER_AGENT),
        window_width: parse_u32("TAGPULSE_WINDOW_WIDTH", "1920")?,
        window_height: parse_u32("TAGPULSE_WINDOW_HEIGHT", "1080")?,
        sentiment_url: optional("TAGPULSE_SENTIMENT_URL"),
        sentiment_timeout_secs: parse_u64("TAGPULSE_SENTIMENT_TIMEOUT_SECS", "15")?,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs: parse_u64("TAGPULSE_DB_ACQUIRE_TIMEOUT_SECS", "10")?,
        pipeline,
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a comma-separated tag list. Entries failing tag normalization are
/// dropped; an empty string yields an empty set.
fn parse_tag_list(raw: &str) -> BTreeSet<String> {
    raw.split(',').filter_map(normalize_tag).collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
