//! Personas Persistence - Database entities and persistence models
//!
//! This crate provides:
//! - SeaORM entity definition for the `persona` table
//! - Domain model types passed between the service and the HTTP layer

pub mod entity;
pub mod model;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export entity prelude
pub use entity::prelude::*;

// Re-export model types
pub use model::{NewPersona, Persona, PersonaPatch};
