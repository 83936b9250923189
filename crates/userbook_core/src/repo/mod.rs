//! Repository layer abstractions and storage implementations.
//!
//! # Responsibility
//! - Define the data access contract for user records.
//! - Own identity assignment and timestamp stamping.
//!
//! # Invariants
//! - Repositories assume input already passed `UserInput::validate()`.
//! - Id-addressed operations report `NotFound` without mutating state.

pub mod user_repo;
