//! User domain model.
//!
//! # Responsibility
//! - Define the stored `User` record and the `UserInput` write shape.
//! - Provide pre-flight validation for create/update requests.
//!
//! # Invariants
//! - `id` is assigned by the repository and never reused.
//! - `created_at` is set once at creation and never changes.
//! - `updated_at` is refreshed on every successful update.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Repository-assigned user identity. Starts at 1 and only grows.
pub type UserId = u64;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const AGE_MIN: i32 = 1;
pub const AGE_MAX: i32 = 120;

// Dot-atom local part: no leading, trailing or doubled dots.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~\-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~\-]+)*"#,
        r"@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    ))
    .expect("valid email regex")
});

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for create and update.
///
/// Identity and timestamps are absent on purpose: they are always stamped by
/// the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub age: i32,
}

/// Field rule violated by a `UserInput`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    NameRequired,
    NameTooShort,
    NameTooLong,
    EmailRequired,
    InvalidEmail,
    AgeNotPositive,
    AgeTooLarge,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "name is required"),
            Self::NameTooShort => write!(
                f,
                "name must be at least {NAME_MIN_CHARS} characters long"
            ),
            Self::NameTooLong => write!(
                f,
                "name must be at most {NAME_MAX_CHARS} characters long"
            ),
            Self::EmailRequired => write!(f, "email is required"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::AgeNotPositive => write!(f, "age must be greater than 0"),
            Self::AgeTooLarge => write!(f, "age must be less than or equal to {AGE_MAX}"),
        }
    }
}

impl Error for UserValidationError {}

impl UserInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
        }
    }

    /// Checks every field rule in order and reports the first violation.
    ///
    /// # Errors
    /// - Name: required, then length within `2..=100` characters.
    /// - Email: required, then must match an address shape.
    /// - Age: must lie within `1..=120`.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.is_empty() {
            return Err(UserValidationError::NameRequired);
        }
        let name_chars = self.name.chars().count();
        if name_chars < NAME_MIN_CHARS {
            return Err(UserValidationError::NameTooShort);
        }
        if name_chars > NAME_MAX_CHARS {
            return Err(UserValidationError::NameTooLong);
        }
        if self.email.is_empty() {
            return Err(UserValidationError::EmailRequired);
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(UserValidationError::InvalidEmail);
        }
        if self.age < AGE_MIN {
            return Err(UserValidationError::AgeNotPositive);
        }
        if self.age > AGE_MAX {
            return Err(UserValidationError::AgeTooLarge);
        }
        Ok(())
    }
}

impl From<&User> for UserInput {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age,
        }
    }
}

impl User {
    /// Returns the editable fields of this record.
    pub fn to_input(&self) -> UserInput {
        UserInput::from(self)
    }
}
