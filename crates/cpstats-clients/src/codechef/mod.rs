//! CodeChef client: community REST mirror first, public profile page second.
//!
//! The profile page is only consulted when the mirror call fails outright
//! (network error, timeout, non-2xx, undecodable body). A mirror answer of
//! `success: false` is a clean "not found" and ends the lookup.

mod api;
mod scrape;

use std::time::Duration;

use chrono::Utc;
use cpstats_core::app_config::DEFAULT_SCRAPER_USER_AGENT;
use cpstats_core::{CodeChefProfile, Platform};
use reqwest::{Client, Url};

use crate::error::ProfileError;

pub use scrape::{parse_profile_page, PageParser, ParseStrategy, PROFILE_PAGE_V1};

const DEFAULT_API_URL: &str = "https://codechef-api.vercel.app";
const DEFAULT_SITE_URL: &str = "https://www.codechef.com";

/// Endpoints, timeouts, and scrape identity for [`CodeChefClient`].
#[derive(Debug, Clone)]
pub struct CodeChefSettings {
    pub api_url: String,
    pub site_url: String,
    pub api_timeout: Duration,
    pub scrape_timeout: Duration,
    pub user_agent: String,
    pub strategy: &'static ParseStrategy,
}

impl Default for CodeChefSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            site_url: DEFAULT_SITE_URL.to_owned(),
            api_timeout: Duration::from_secs(10),
            scrape_timeout: Duration::from_secs(15),
            user_agent: DEFAULT_SCRAPER_USER_AGENT.to_owned(),
            strategy: &PROFILE_PAGE_V1,
        }
    }
}

pub struct CodeChefClient {
    client: Client,
    api_base: Url,
    site_base: Url,
    api_timeout: Duration,
    scrape_timeout: Duration,
    user_agent: String,
    parser: PageParser,
}

impl CodeChefClient {
    /// # Errors
    ///
    /// Returns [`ProfileError::Http`] if the `reqwest::Client` cannot be built,
    /// [`ProfileError::InvalidBaseUrl`] if either base URL does not parse, or
    /// [`ProfileError::Parse`] if the parse strategy does not compile.
    pub fn new(settings: CodeChefSettings) -> Result<Self, ProfileError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| ProfileError::Http {
                platform: Platform::CodeChef,
                source,
            })?;

        Ok(Self {
            client,
            api_base: parse_base(&settings.api_url)?,
            site_base: parse_base(&settings.site_url)?,
            api_timeout: settings.api_timeout,
            scrape_timeout: settings.scrape_timeout,
            user_agent: settings.user_agent,
            parser: PageParser::new(settings.strategy)?,
        })
    }

    /// Fetches one user's rating, ranks, and stars.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::NotFound`] from either the mirror or the profile page.
    /// - [`ProfileError::Parse`] if the profile page no longer matches the
    ///   configured [`ParseStrategy`].
    /// - [`ProfileError::Scrape`] for any other fallback failure.
    ///
    /// Mirror failures other than "not found" are logged and never returned.
    pub async fn fetch_profile(&self, username: &str) -> Result<CodeChefProfile, ProfileError> {
        match self.fetch_from_api(username).await {
            Ok(profile) => Ok(profile),
            Err(e) if e.is_not_found() => Err(e),
            Err(e) => {
                tracing::warn!(
                    username,
                    error = %e,
                    "codechef: mirror failed, falling back to profile page"
                );
                self.scrape_profile(username).await
            }
        }
    }

    async fn fetch_from_api(&self, username: &str) -> Result<CodeChefProfile, ProfileError> {
        let http = |source| ProfileError::Http {
            platform: Platform::CodeChef,
            source,
        };
        let url = user_url(&self.api_base, "handle", username);

        let response = self
            .client
            .get(url)
            .timeout(self.api_timeout)
            .send()
            .await
            .map_err(http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::UnexpectedStatus {
                platform: Platform::CodeChef,
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(http)?;
        let parsed = serde_json::from_str(&text).map_err(|source| ProfileError::Deserialize {
            platform: Platform::CodeChef,
            context: format!("handle/{username}"),
            source,
        })?;

        api::normalize_mirror_response(parsed, username, Utc::now())
    }

    async fn scrape_profile(&self, username: &str) -> Result<CodeChefProfile, ProfileError> {
        let scrape_failed = |reason: String| ProfileError::Scrape {
            platform: Platform::CodeChef,
            reason,
        };
        let url = user_url(&self.site_base, "users", username);

        let response = self
            .client
            .get(url)
            .timeout(self.scrape_timeout)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| scrape_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(scrape_failed(format!("HTTP {status}")));
        }

        let html = response
            .text()
            .await
            .map_err(|e| scrape_failed(e.to_string()))?;

        let profile = self.parser.parse(&html, username, Utc::now())?;
        tracing::info!(
            username,
            strategy = self.parser.version(),
            "codechef: profile page scraped"
        );
        Ok(profile)
    }
}

fn parse_base(raw: &str) -> Result<Url, ProfileError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ProfileError::InvalidBaseUrl {
        platform: Platform::CodeChef,
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// Appends `/{section}/{username}` with the handle percent-encoded as one
/// path segment.
fn user_url(base: &Url, section: &str, username: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(section).push(username);
    }
    url
}
