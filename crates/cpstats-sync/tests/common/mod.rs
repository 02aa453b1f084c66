//! Fakes shared by the sync integration tests.
//!
//! Each test binary uses a different subset.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use cpstats_clients::{PlatformClients, ProfileError, ProfileFetcher};
use cpstats_core::{
    CodeChefProfile, CodingProfiles, LeetCodeProfile, Platform, PlatformProfile, ProblemsSolved,
    UserRecord,
};
use cpstats_sync::{DirectoryError, MemoryDirectory, RateLimiter, UserDirectory};
use tokio::sync::Notify;
use uuid::Uuid;

pub type CallLog = Arc<Mutex<Vec<(Platform, String)>>>;

pub fn fetched_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 24, 21, 30, 0).unwrap()
}

pub fn leetcode_profile(username: &str) -> PlatformProfile {
    LeetCodeProfile::fetched(
        username,
        Some(1_000),
        Some(7),
        ProblemsSolved {
            easy: 10,
            medium: 5,
            hard: 1,
            total: 16,
        },
        fetched_at(),
    )
    .into()
}

pub fn codechef_profile(username: &str) -> PlatformProfile {
    CodeChefProfile {
        username: Some(username.to_string()),
        stars: 3,
        rating: Some(1850),
        highest_rating: Some(1900),
        global_rank: Some(4_200),
        country_rank: Some(310),
        last_updated: Some(fetched_at()),
        verified: true,
    }
    .into()
}

/// Answers from a fixed script keyed by username; unknown handles are
/// reported as not found. Every call is appended to a shared log.
pub struct ScriptedFetcher {
    platform: Platform,
    failures: HashMap<String, fn(Platform) -> ProfileError>,
    known: Vec<String>,
    calls: CallLog,
}

impl ScriptedFetcher {
    pub fn new(platform: Platform, calls: CallLog) -> Self {
        Self {
            platform,
            failures: HashMap::new(),
            known: Vec::new(),
            calls,
        }
    }

    pub fn knows(mut self, username: &str) -> Self {
        self.known.push(username.to_string());
        self
    }

    pub fn fails_with(mut self, username: &str, error: fn(Platform) -> ProfileError) -> Self {
        self.failures.insert(username.to_string(), error);
        self
    }
}

#[async_trait]
impl ProfileFetcher for ScriptedFetcher {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch_profile(&self, username: &str) -> Result<PlatformProfile, ProfileError> {
        self.calls
            .lock()
            .unwrap()
            .push((self.platform, username.to_string()));

        if let Some(error) = self.failures.get(username) {
            return Err(error(self.platform));
        }
        if !self.known.iter().any(|k| k == username) {
            return Err(ProfileError::NotFound {
                platform: self.platform,
                username: username.to_string(),
            });
        }
        Ok(match self.platform {
            Platform::LeetCode => leetcode_profile(username),
            Platform::CodeChef => codechef_profile(username),
        })
    }
}

pub fn transient(platform: Platform) -> ProfileError {
    ProfileError::Scrape {
        platform,
        reason: "connection reset".to_string(),
    }
}

pub fn clients(leetcode: ScriptedFetcher, codechef: ScriptedFetcher) -> PlatformClients {
    PlatformClients::new(Arc::new(leetcode), Arc::new(codechef))
}

/// A user whose handles are configured but never fetched.
pub fn user(leetcode: Option<&str>, codechef: Option<&str>) -> UserRecord {
    let mut user = UserRecord::new(Uuid::new_v4());
    user.coding_profiles = CodingProfiles {
        leetcode: leetcode.map(LeetCodeProfile::pending).unwrap_or_default(),
        codechef: codechef.map(CodeChefProfile::pending).unwrap_or_default(),
    };
    user
}

/// Counts `pace` calls without sleeping.
#[derive(Default)]
pub struct CountingLimiter {
    calls: Mutex<u32>,
}

impl CountingLimiter {
    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl RateLimiter for CountingLimiter {
    async fn pace(&self) {
        *self.calls.lock().unwrap() += 1;
    }
}

/// Blocks inside `pace` until released, so a run can be held open.
#[derive(Default)]
pub struct HeldLimiter {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl RateLimiter for HeldLimiter {
    async fn pace(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

/// Wraps a [`MemoryDirectory`], failing listing or saves on demand.
#[derive(Default)]
pub struct FlakyDirectory {
    pub inner: MemoryDirectory,
    pub fail_listing: bool,
    pub fail_save_for: Option<Uuid>,
}

#[async_trait]
impl UserDirectory for FlakyDirectory {
    async fn users_with_profiles(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        if self.fail_listing {
            return Err(DirectoryError::Unavailable("database offline".to_string()));
        }
        self.inner.users_with_profiles().await
    }

    async fn load_user(&self, id: Uuid) -> Result<Option<UserRecord>, DirectoryError> {
        self.inner.load_user(id).await
    }

    async fn save_profiles(
        &self,
        id: Uuid,
        profiles: &CodingProfiles,
    ) -> Result<(), DirectoryError> {
        if self.fail_save_for == Some(id) {
            return Err(DirectoryError::Unavailable("write rejected".to_string()));
        }
        self.inner.save_profiles(id, profiles).await
    }

    async fn save_platform_profiles(
        &self,
        id: Uuid,
        updates: &[PlatformProfile],
    ) -> Result<(), DirectoryError> {
        if self.fail_save_for == Some(id) {
            return Err(DirectoryError::Unavailable("write rejected".to_string()));
        }
        self.inner.save_platform_profiles(id, updates).await
    }
}
