//! Keeps stored coding profiles fresh: the nightly bulk refresh, its
//! scheduler, and the single-user operations behind operator commands.

pub mod directory;
pub mod job;
pub mod rate_limit;
pub mod scheduler;
pub mod service;

pub use directory::{DirectoryError, JsonFileDirectory, MemoryDirectory, UserDirectory};
pub use job::{BulkRefreshJob, RefreshError, RefreshOutcome};
pub use rate_limit::{limiter_for, FixedDelay, IntervalGate, RateLimiter};
pub use scheduler::{build_scheduler, RefreshSchedule};
pub use service::{ProfileService, ServiceError};
