//! User use-case service.
//!
//! # Responsibility
//! - Provide the CRUD and stats entry points used by transport layers.
//! - Validate input before any repository mutation.
//!
//! # Invariants
//! - A rejected input never reaches the repository.
//! - Log events carry ids and counts only, never names or emails.

use crate::clock::{Clock, SystemClock};
use crate::logging::{log_user_op, Outcome};
use crate::model::user::{User, UserId, UserInput, UserValidationError};
use crate::repo::user_repo::{RepoError, UserRepository};
use crate::stats::{compute_stats, UserStats};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for user use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    /// Input violates a field rule.
    Validation(UserValidationError),
    /// Target user does not exist.
    NotFound(UserId),
}

impl ServiceError {
    /// Whether the caller referenced a missing user.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the caller supplied bad input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "user not found: {id}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<UserValidationError> for ServiceError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
        }
    }
}

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: UserRepository, C: Clock> UserService<R, C> {
    /// Creates a service whose stats reports are stamped from `clock`.
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn list_users(&self) -> Vec<User> {
        self.repo.get_all()
    }

    pub fn get_user(&self, id: UserId) -> ServiceResult<User> {
        Ok(self.repo.get_by_id(id)?)
    }

    /// Validates `input` and stores it as a new user.
    pub fn create_user(&self, input: &UserInput) -> ServiceResult<User> {
        validate_input("create", None, input)?;
        let user = self.repo.create(input);
        log_user_op("create", Some(user.id), Outcome::Ok);
        Ok(user)
    }

    /// Validates `input` and replaces the editable fields of user `id`.
    ///
    /// Validation runs first, so an invalid input for a missing id reports
    /// the validation failure.
    pub fn update_user(&self, id: UserId, input: &UserInput) -> ServiceResult<User> {
        validate_input("update", Some(id), input)?;
        let result = self.repo.update(id, input);
        log_user_op("update", Some(id), outcome_of(&result));
        Ok(result?)
    }

    pub fn delete_user(&self, id: UserId) -> ServiceResult<()> {
        let result = self.repo.delete(id);
        log_user_op("delete", Some(id), outcome_of(&result));
        Ok(result?)
    }

    /// Computes a stats report over every stored user.
    pub fn stats(&self) -> UserStats {
        let stats = compute_stats(&self.repo, &self.clock);
        info!(
            "event=user_stats module=service status=ok total_users={}",
            stats.total_users
        );
        stats
    }
}

fn validate_input(
    op: &str,
    user_id: Option<UserId>,
    input: &UserInput,
) -> Result<(), UserValidationError> {
    input.validate().map_err(|err| {
        log_user_op(op, user_id, Outcome::Rejected(err));
        err
    })
}

fn outcome_of<T>(result: &Result<T, RepoError>) -> Outcome {
    match result {
        Ok(_) => Outcome::Ok,
        Err(RepoError::NotFound(_)) => Outcome::NotFound,
    }
}
