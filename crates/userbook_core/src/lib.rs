//! Core domain logic for Userbook.
//! This crate owns user records, their validation rules and derived stats.

pub mod clock;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use logging::{init_logging, LogConfig, LoggingError};
pub use model::user::{User, UserId, UserInput, UserValidationError};
pub use repo::user_repo::{InMemoryUserRepository, RepoError, RepoResult, UserRepository};
pub use service::user_service::{ServiceError, ServiceResult, UserService};
pub use stats::{compute_stats, summarize, AgeBucket, AgeRanges, UserStats};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
