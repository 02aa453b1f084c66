use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::FixedOffset;

pub const DEFAULT_SCRAPER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// How the bulk refresh waits between users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshLimiter {
    /// Sleep the full delay after every user.
    #[default]
    Fixed,
    /// Wait only for what remains of the delay since the previous user started.
    Interval,
}

impl RefreshLimiter {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Interval => "interval",
        }
    }
}

impl fmt::Display for RefreshLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefreshLimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "interval" => Ok(Self::Interval),
            other => Err(format!("expected fixed or interval, got \"{other}\"")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub users_path: PathBuf,
    pub leetcode_url: String,
    pub leetcode_timeout_secs: u64,
    pub codechef_api_url: String,
    pub codechef_api_timeout_secs: u64,
    pub codechef_site_url: String,
    pub codechef_scrape_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Six-field cron expression (seconds first).
    pub refresh_cron: String,
    /// Wall-clock zone the cron expression is evaluated in.
    pub refresh_utc_offset: FixedOffset,
    pub refresh_delay_ms: u64,
    pub refresh_limiter: RefreshLimiter,
}
