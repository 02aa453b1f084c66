pub mod app_config;
pub mod config;
pub mod platform;
pub mod profiles;

pub use app_config::{AppConfig, RefreshLimiter};
pub use config::{load_app_config, load_app_config_from_env};
pub use platform::{InvalidPlatform, Platform};
pub use profiles::{
    CodeChefProfile, CodingProfiles, LeetCodeProfile, PlatformProfile, ProblemsSolved, UserRecord,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
