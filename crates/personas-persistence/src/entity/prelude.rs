//! `SeaORM` Entity prelude

pub use super::persona::Entity as PersonaEntity;
