//! Domain model for user records.
//!
//! # Responsibility
//! - Define the canonical user record and the caller-supplied input shape.
//! - Own field-level validation rules shared by every write path.
//!
//! # Invariants
//! - Every stored user is identified by a repository-assigned `UserId`.
//! - Input is validated before it can reach a repository.

pub mod user;
