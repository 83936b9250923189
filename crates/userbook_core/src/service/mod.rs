//! Core use-case services.
//!
//! # Responsibility
//! - Gate repository writes behind input validation.
//! - Keep transport layers decoupled from storage details.

pub mod user_service;
