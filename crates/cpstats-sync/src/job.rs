//! The bulk refresh: walk every user with a configured handle, refetch each
//! platform, and persist the refetched slots before moving on.

use std::sync::Arc;

use cpstats_clients::PlatformClients;
use cpstats_core::{Platform, PlatformProfile, UserRecord};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::directory::{DirectoryError, UserDirectory};
use crate::rate_limit::RateLimiter;

/// Aggregate counts for one bulk run.
///
/// `success_count` and `error_count` count platform fetches (and failed
/// saves), not users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub success_count: u32,
    pub error_count: u32,
    pub total_users_processed: u32,
}

#[derive(Debug, Error)]
pub enum RefreshError {
    /// Listing users failed, so there was nothing to iterate.
    #[error("failed to list users: {0}")]
    Directory(#[from] DirectoryError),

    #[error("a bulk refresh is already running")]
    AlreadyRunning,
}

pub struct BulkRefreshJob {
    directory: Arc<dyn UserDirectory>,
    clients: PlatformClients,
    limiter: Arc<dyn RateLimiter>,
    pub(crate) running: Mutex<()>,
}

impl BulkRefreshJob {
    #[must_use]
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        clients: PlatformClients,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            directory,
            clients,
            limiter,
            running: Mutex::new(()),
        }
    }

    /// Refreshes every user that has at least one platform handle.
    ///
    /// Users are processed one at a time in directory order; within a user
    /// LeetCode goes before CodeChef. A failed fetch leaves that platform's
    /// stored profile untouched and is counted, never propagated. Each user's
    /// refetched platforms are saved as soon as the user is processed, merged
    /// into the stored record as it is at write time, then the limiter is
    /// paced. A user whose fetches all failed is not written.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::AlreadyRunning`] if another run holds the
    /// guard, or [`RefreshError::Directory`] if the user list cannot be read.
    pub async fn refresh_all_profiles(&self) -> Result<RefreshOutcome, RefreshError> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::warn!("refresh: run already in progress; skipping");
            return Err(RefreshError::AlreadyRunning);
        };

        let users = self.directory.users_with_profiles().await.map_err(|e| {
            tracing::error!(error = %e, "refresh: failed to list users");
            RefreshError::from(e)
        })?;

        tracing::info!(users = users.len(), "refresh: starting bulk run");

        let mut outcome = RefreshOutcome::default();
        for user in users {
            self.refresh_user(&user, &mut outcome).await;
            outcome.total_users_processed += 1;
            self.limiter.pace().await;
        }

        tracing::info!(
            success = outcome.success_count,
            failed = outcome.error_count,
            users = outcome.total_users_processed,
            "refresh: bulk run complete"
        );
        Ok(outcome)
    }

    /// Operator entry point; runs the same pass as the scheduled trigger.
    ///
    /// # Errors
    ///
    /// Same as [`Self::refresh_all_profiles`].
    pub async fn trigger_manual_refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        tracing::info!("refresh: manual trigger");
        self.refresh_all_profiles().await
    }

    async fn refresh_user(&self, user: &UserRecord, outcome: &mut RefreshOutcome) {
        let mut updates: Vec<PlatformProfile> = Vec::with_capacity(Platform::ALL.len());
        for platform in Platform::ALL {
            let Some(username) = user.coding_profiles.username(platform) else {
                continue;
            };

            match self.clients.fetch_profile(platform, username).await {
                Ok(profile) => {
                    updates.push(profile);
                    outcome.success_count += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        user_id = %user.id,
                        %platform,
                        username,
                        kind = ?e.kind(),
                        error = %e,
                        "refresh: platform fetch failed; keeping stored profile"
                    );
                    outcome.error_count += 1;
                }
            }
        }

        if updates.is_empty() {
            return;
        }
        // Only the refetched slots are written; the listing snapshot may be stale.
        if let Err(e) = self
            .directory
            .save_platform_profiles(user.id, &updates)
            .await
        {
            tracing::error!(user_id = %user.id, error = %e, "refresh: failed to save user");
            outcome.error_count += 1;
        }
    }
}
