//! Domain model types for persistence operations
//!
//! These types decouple the HTTP layer from the SeaORM entity.

use chrono::NaiveDate;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::entity::persona;

/// A stored persona record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub is_active: bool,
    pub notes: Option<String>,
}

impl From<persona::Model> for Persona {
    fn from(value: persona::Model) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            birth_date: value.birth_date,
            is_active: value.is_active,
            notes: value.notes,
        }
    }
}

/// A persona that has not been stored yet (no identifier)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPersona {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub is_active: bool,
    pub notes: Option<String>,
}

impl NewPersona {
    /// Builds an insertable active model; the identifier is left to the database.
    pub fn into_active_model(self) -> persona::ActiveModel {
        persona::ActiveModel {
            id: NotSet,
            first_name: Set(self.first_name),
            last_name: Set(self.last_name),
            email: Set(self.email),
            phone: Set(self.phone),
            birth_date: Set(self.birth_date),
            is_active: Set(self.is_active),
            notes: Set(self.notes),
        }
    }
}

/// Partial update of a persona.
///
/// `None` leaves a field untouched. For nullable columns the inner option
/// distinguishes "clear the value" (`Some(None)`) from "set a value".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersonaPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub is_active: Option<bool>,
    pub notes: Option<Option<String>>,
}

impl PersonaPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.birth_date.is_none()
            && self.is_active.is_none()
            && self.notes.is_none()
    }

    /// Copies only the supplied fields onto the active model.
    pub fn apply(self, model: &mut persona::ActiveModel) {
        if let Some(v) = self.first_name {
            model.first_name = Set(v);
        }
        if let Some(v) = self.last_name {
            model.last_name = Set(v);
        }
        if let Some(v) = self.email {
            model.email = Set(v);
        }
        if let Some(v) = self.phone {
            model.phone = Set(v);
        }
        if let Some(v) = self.birth_date {
            model.birth_date = Set(v);
        }
        if let Some(v) = self.is_active {
            model.is_active = Set(v);
        }
        if let Some(v) = self.notes {
            model.notes = Set(v);
        }
    }
}
