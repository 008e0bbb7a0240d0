//! Personas Common - Shared error types and constants
//!
//! This crate provides the types used across all Personas components:
//! - Domain error enum and error codes
//! - Common constants for the persona domain

pub mod error;

// Re-exports for convenience
pub use error::{ErrorCode, PersonaError, find_persona_error};

/// Email domains used for synthetic personas
pub const SYNTHETIC_EMAIL_DOMAINS: [&str; 4] =
    ["gmail.com", "outlook.com", "yahoo.com", "hotmail.com"];

/// Upper bound for a single bulk populate request
pub const MAX_POPULATE_COUNT: i64 = 1000;

/// Upper bound for a single list page
pub const MAX_PAGE_LIMIT: u64 = 1000;

/// Page size used when the client does not send one
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Youngest age a synthetic persona can have at generation time
pub const MIN_SYNTHETIC_AGE: u32 = 18;

/// Oldest age a synthetic persona can have at generation time
pub const MAX_SYNTHETIC_AGE: u32 = 90;
