use std::path::PathBuf;

use chrono::FixedOffset;

use crate::app_config::{AppConfig, RefreshLimiter, DEFAULT_SCRAPER_USER_AGENT};
use crate::ConfigError;

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
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let parse_offset = |var: &str, default: &str| -> Result<FixedOffset, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<FixedOffset>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected an offset like +05:30: {e}"),
            })
    };

    let log_level = or_default("CPSTATS_LOG_LEVEL", "info");
    let users_path = PathBuf::from(or_default("CPSTATS_USERS_PATH", "./data/users.json"));

    let leetcode_url = or_default("CPSTATS_LEETCODE_URL", "https://leetcode.com");
    let leetcode_timeout_secs = parse_u64("CPSTATS_LEETCODE_TIMEOUT_SECS", "15")?;

    let codechef_api_url = or_default(
        "CPSTATS_CODECHEF_API_URL",
        "https://codechef-api.vercel.app",
    );
    let codechef_api_timeout_secs = parse_u64("CPSTATS_CODECHEF_API_TIMEOUT_SECS", "10")?;
    let codechef_site_url = or_default("CPSTATS_CODECHEF_SITE_URL", "https://www.codechef.com");
    let codechef_scrape_timeout_secs = parse_u64("CPSTATS_CODECHEF_SCRAPE_TIMEOUT_SECS", "15")?;
    let scraper_user_agent = or_default("CPSTATS_SCRAPER_USER_AGENT", DEFAULT_SCRAPER_USER_AGENT);

    let refresh_cron = or_default("CPSTATS_REFRESH_CRON", "0 0 3 * * *");
    if refresh_cron.split_whitespace().count() < 6 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CPSTATS_REFRESH_CRON".to_string(),
            reason: format!("expected a six-field cron expression, got \"{refresh_cron}\""),
        });
    }
    let refresh_utc_offset = parse_offset("CPSTATS_REFRESH_UTC_OFFSET", "+05:30")?;
    let refresh_delay_ms = parse_u64("CPSTATS_REFRESH_DELAY_MS", "2000")?;
    let refresh_limiter = or_default("CPSTATS_REFRESH_LIMITER", "fixed")
        .parse::<RefreshLimiter>()
        .map_err(|reason| ConfigError::InvalidEnvVar {
            var: "CPSTATS_REFRESH_LIMITER".to_string(),
            reason,
        })?;

    Ok(AppConfig {
        log_level,
        users_path,
        leetcode_url,
        leetcode_timeout_secs,
        codechef_api_url,
        codechef_api_timeout_secs,
        codechef_site_url,
        codechef_scrape_timeout_secs,
        scraper_user_agent,
        refresh_cron,
        refresh_utc_offset,
        refresh_delay_ms,
        refresh_limiter,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
