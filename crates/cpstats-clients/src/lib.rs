pub mod codechef;
pub mod error;
pub mod fetcher;
pub mod leetcode;
pub mod stars;
pub mod types;
pub mod verify;

pub use codechef::{
    CodeChefClient, CodeChefSettings, PageParser, ParseStrategy, PROFILE_PAGE_V1,
};
pub use error::{ErrorKind, ProfileError};
pub use fetcher::{PlatformClients, ProfileFetcher};
pub use leetcode::LeetCodeClient;
pub use stars::calculate_stars;
pub use verify::{ProfileVerifier, Verification};
