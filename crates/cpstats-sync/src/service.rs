use std::sync::Arc;

use cpstats_clients::{PlatformClients, ProfileError, ProfileVerifier, Verification};
use cpstats_core::{CodingProfiles, Platform, PlatformProfile, UserRecord};
use thiserror::Error;
use uuid::Uuid;

use crate::directory::{DirectoryError, UserDirectory};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("username is required")]
    MissingUsername,

    #[error("user {0} not found")]
    UserNotFound(Uuid),

    #[error("no {0} username configured")]
    NotConfigured(Platform),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Single-user, single-platform operations for on-demand callers.
///
/// Unlike the bulk job, every failure here propagates so the caller can turn
/// it into a rejection.
pub struct ProfileService {
    directory: Arc<dyn UserDirectory>,
    clients: PlatformClients,
    verifier: ProfileVerifier,
}

impl ProfileService {
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>, clients: PlatformClients) -> Self {
        let verifier = ProfileVerifier::new(clients.clone());
        Self {
            directory,
            clients,
            verifier,
        }
    }

    /// Links `username` on `platform` to the user and stores a fresh fetch.
    ///
    /// Nothing is written unless the fetch succeeds, and only the `platform`
    /// slot is written.
    ///
    /// # Errors
    ///
    /// [`ServiceError::MissingUsername`] for a blank handle,
    /// [`ServiceError::UserNotFound`] for an unknown user, otherwise the
    /// fetch or save error.
    pub async fn add_profile(
        &self,
        user_id: Uuid,
        platform: Platform,
        username: &str,
    ) -> Result<PlatformProfile, ServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::MissingUsername);
        }
        self.require_user(user_id).await?;

        let profile = self.clients.fetch_profile(platform, username).await?;
        self.directory
            .save_platform_profiles(user_id, std::slice::from_ref(&profile))
            .await?;

        tracing::info!(%user_id, %platform, username, "service: profile added");
        Ok(profile)
    }

    /// Refetches the user's configured handle on `platform`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotConfigured`] if no handle is set for `platform`,
    /// otherwise as for [`Self::add_profile`].
    pub async fn refresh_profile(
        &self,
        user_id: Uuid,
        platform: Platform,
    ) -> Result<PlatformProfile, ServiceError> {
        let user = self.require_user(user_id).await?;
        let username = user
            .coding_profiles
            .username(platform)
            .map(str::to_owned)
            .ok_or(ServiceError::NotConfigured(platform))?;

        let profile = self.clients.fetch_profile(platform, &username).await?;
        self.directory
            .save_platform_profiles(user_id, std::slice::from_ref(&profile))
            .await?;

        tracing::info!(%user_id, %platform, username, "service: profile refreshed");
        Ok(profile)
    }

    /// Resets `platform` to the unconfigured state. Removing a platform that
    /// was never configured succeeds without writing.
    ///
    /// # Errors
    ///
    /// [`ServiceError::UserNotFound`] or a directory error.
    pub async fn remove_profile(
        &self,
        user_id: Uuid,
        platform: Platform,
    ) -> Result<(), ServiceError> {
        let mut user = self.require_user(user_id).await?;
        let before = user.coding_profiles.clone();
        user.coding_profiles.clear(platform);
        if user.coding_profiles == before {
            return Ok(());
        }
        self.directory
            .save_platform_profiles(user_id, &[user.coding_profiles.get(platform)])
            .await?;
        tracing::info!(%user_id, %platform, "service: profile removed");
        Ok(())
    }

    /// # Errors
    ///
    /// [`ServiceError::UserNotFound`] or a directory error.
    pub async fn get_profiles(&self, user_id: Uuid) -> Result<CodingProfiles, ServiceError> {
        Ok(self.require_user(user_id).await?.coding_profiles)
    }

    pub async fn verify_username(&self, platform: Platform, username: &str) -> bool {
        self.verifier.verify_username(platform, username).await
    }

    pub async fn check_username(&self, platform: Platform, username: &str) -> Verification {
        self.verifier.check_username(platform, username).await
    }

    async fn require_user(&self, user_id: Uuid) -> Result<UserRecord, ServiceError> {
        self.directory
            .load_user(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))
    }
}
