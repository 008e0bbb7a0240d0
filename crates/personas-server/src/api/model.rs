//! Request and response bodies of the persona API

use chrono::NaiveDate;
use personas_common::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MAX_POPULATE_COUNT};
use personas_persistence::{NewPersona, PersonaPatch};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::POPULATE_OUT_OF_RANGE_MESSAGE;
use crate::service::stats::AgeStats;

fn default_active() -> bool {
    true
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct PersonaCreate {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub notes: Option<String>,
}

impl From<PersonaCreate> for NewPersona {
    fn from(value: PersonaCreate) -> Self {
        Self {
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

/// Partial update body.
///
/// Absent fields are left alone. `null` clears phone, birth date and notes;
/// on the other fields it is the same as leaving them out.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PersonaUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
}

impl From<PersonaUpdate> for PersonaPatch {
    fn from(value: PersonaUpdate) -> Self {
        Self {
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

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct PoblarRequest {
    #[validate(range(
        min = 1,
        max = MAX_POPULATE_COUNT,
        message = "La cantidad debe ser mayor a 0 y menor o igual a 1000."
    ))]
    pub cantidad: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoblarResponse {
    pub message: String,
    pub inserted_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeStatsResponse {
    pub edad_promedio: i32,
    pub edad_minima: i32,
    pub edad_maxima: i32,
}

impl From<AgeStats> for AgeStatsResponse {
    fn from(value: AgeStats) -> Self {
        Self {
            edad_promedio: value.average,
            edad_minima: value.minimum,
            edad_maxima: value.maximum,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_PAGE_LIMIT))]
    pub limit: u64,
}

impl PoblarRequest {
    /// The count as accepted by the service, once validated.
    pub fn count(&self) -> u64 {
        u64::try_from(self.cantidad).unwrap_or_default()
    }
}
