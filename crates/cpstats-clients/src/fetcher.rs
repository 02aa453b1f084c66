use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cpstats_core::{AppConfig, Platform, PlatformProfile};

use crate::codechef::{CodeChefClient, CodeChefSettings};
use crate::error::ProfileError;
use crate::leetcode::LeetCodeClient;

/// Fetches one platform's profile for a remote handle.
///
/// Implementations return a verified profile stamped with the fetch time, or
/// an error; never a partially filled profile.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    fn platform(&self) -> Platform;

    async fn fetch_profile(&self, username: &str) -> Result<PlatformProfile, ProfileError>;
}

#[async_trait]
impl ProfileFetcher for LeetCodeClient {
    fn platform(&self) -> Platform {
        Platform::LeetCode
    }

    async fn fetch_profile(&self, username: &str) -> Result<PlatformProfile, ProfileError> {
        LeetCodeClient::fetch_profile(self, username)
            .await
            .map(PlatformProfile::LeetCode)
    }
}

#[async_trait]
impl ProfileFetcher for CodeChefClient {
    fn platform(&self) -> Platform {
        Platform::CodeChef
    }

    async fn fetch_profile(&self, username: &str) -> Result<PlatformProfile, ProfileError> {
        CodeChefClient::fetch_profile(self, username)
            .await
            .map(PlatformProfile::CodeChef)
    }
}

/// One fetcher per platform, built once at startup and shared by reference.
#[derive(Clone)]
pub struct PlatformClients {
    leetcode: Arc<dyn ProfileFetcher>,
    codechef: Arc<dyn ProfileFetcher>,
}

impl PlatformClients {
    #[must_use]
    pub fn new(leetcode: Arc<dyn ProfileFetcher>, codechef: Arc<dyn ProfileFetcher>) -> Self {
        Self { leetcode, codechef }
    }

    /// Builds the production clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] if an HTTP client cannot be built or a
    /// configured base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProfileError> {
        let leetcode = LeetCodeClient::with_base_url(
            &config.leetcode_url,
            Duration::from_secs(config.leetcode_timeout_secs),
        )?;
        let codechef = CodeChefClient::new(CodeChefSettings {
            api_url: config.codechef_api_url.clone(),
            site_url: config.codechef_site_url.clone(),
            api_timeout: Duration::from_secs(config.codechef_api_timeout_secs),
            scrape_timeout: Duration::from_secs(config.codechef_scrape_timeout_secs),
            user_agent: config.scraper_user_agent.clone(),
            ..CodeChefSettings::default()
        })?;
        Ok(Self::new(Arc::new(leetcode), Arc::new(codechef)))
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> &Arc<dyn ProfileFetcher> {
        match platform {
            Platform::LeetCode => &self.leetcode,
            Platform::CodeChef => &self.codechef,
        }
    }

    /// # Errors
    ///
    /// Propagates the platform client's [`ProfileError`] unmodified.
    pub async fn fetch_profile(
        &self,
        platform: Platform,
        username: &str,
    ) -> Result<PlatformProfile, ProfileError> {
        self.get(platform).fetch_profile(username).await
    }
}
