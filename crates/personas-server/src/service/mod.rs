//! Business logic services
//!
//! - `persona` - Storage operations on personas (CRUD, search, statistics, populate, reset)
//! - `stats` - Pure age and email-domain aggregation
//! - `generator` - Seedable synthetic persona generator

pub mod generator;
pub mod persona;
pub mod stats;
