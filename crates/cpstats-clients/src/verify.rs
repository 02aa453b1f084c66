use cpstats_core::Platform;

use crate::error::ErrorKind;
use crate::fetcher::PlatformClients;

/// Outcome of probing a handle on a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Exists,
    NotFound,
    /// The platform could not be reached or its response could not be read.
    Unavailable,
}

/// Existence checks built on the platform clients.
#[derive(Clone)]
pub struct ProfileVerifier {
    clients: PlatformClients,
}

impl ProfileVerifier {
    #[must_use]
    pub fn new(clients: PlatformClients) -> Self {
        Self { clients }
    }

    /// Returns `true` only if a fetch succeeds. Every failure, "not found" or
    /// otherwise, is `false`; use [`Self::check_username`] to tell them apart.
    pub async fn verify_username(&self, platform: Platform, username: &str) -> bool {
        self.check_username(platform, username).await == Verification::Exists
    }

    pub async fn check_username(&self, platform: Platform, username: &str) -> Verification {
        match self.clients.fetch_profile(platform, username).await {
            Ok(_) => Verification::Exists,
            Err(e) if e.kind() == ErrorKind::NotFound => Verification::NotFound,
            Err(e) => {
                tracing::warn!(%platform, username, error = %e, "verify: platform unavailable");
                Verification::Unavailable
            }
        }
    }
}
