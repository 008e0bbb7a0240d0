//! Persona service
//!
//! Every function takes the database connection explicitly and returns
//! `anyhow::Result`; domain failures are [`PersonaError`] values.
//!
//! Email pre-checks are plain reads outside any transaction. Each write is a
//! single statement (or, for populate, a transaction that starts with its
//! first insert), so SQLite never has to upgrade a read lock into a write
//! lock. A losing writer waits on the busy timeout and then hits the unique
//! index on `email`, which has the last word on conflicts.

use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::time::Instant;

use chrono::NaiveDate;
use personas_common::{PersonaError, find_persona_error};
use personas_persistence::entity::persona;
use personas_persistence::sea_orm::*;
use personas_persistence::{NewPersona, Persona, PersonaPatch};

use super::generator::PersonaGenerator;
use super::stats::{self, AgeStats};
use crate::metrics;

const TABLE: &str = "persona";

/// Rows per `INSERT` statement during bulk populate
const INSERT_CHUNK: usize = 100;

/// Runs a service operation and records its duration and outcome.
async fn observed<T, F>(operation: &str, fut: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    let started = Instant::now();
    let result = fut.await;
    let success = match &result {
        Ok(_) => true,
        Err(e) => find_persona_error(e).is_some(),
    };
    metrics::record_db_query(operation, TABLE, started.elapsed().as_secs_f64(), success);
    if let Err(e) = &result
        && !success
    {
        tracing::error!(operation, error = %e, "persona operation failed");
    }
    result
}

/// Turns a unique constraint violation into `EmailAlreadyExists`.
fn conflict_or_db_error(err: DbErr, email: &str) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::warn!(email, detail = %detail, "unique constraint rejected persona email");
            PersonaError::EmailAlreadyExists(email.to_string()).into()
        }
        _ => err.into(),
    }
}

/// Commits on success, rolls back on failure.
async fn finish<T>(
    txn: DatabaseTransaction,
    result: Result<T, DbErr>,
    email: &str,
) -> anyhow::Result<T> {
    match result {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|e| conflict_or_db_error(e, email))?;
            Ok(value)
        }
        Err(e) => {
            txn.rollback().await?;
            Err(conflict_or_db_error(e, email))
        }
    }
}

/// Whether another persona already uses `email`.
async fn email_taken(
    db: &DatabaseConnection,
    email: &str,
    exclude_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut select = persona::Entity::find().filter(persona::Column::Email.eq(email));
    if let Some(id) = exclude_id {
        select = select.filter(persona::Column::Id.ne(id));
    }
    Ok(select.count(db).await? > 0)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub async fn create(db: &DatabaseConnection, new_persona: NewPersona) -> anyhow::Result<Persona> {
    observed("create", async move {
        if email_taken(db, &new_persona.email, None).await? {
            return Err(PersonaError::EmailAlreadyExists(new_persona.email).into());
        }

        let persona = insert(db, new_persona).await?;
        metrics::record_personas_created("single", 1);
        tracing::info!(id = persona.id, "persona created");
        Ok(persona)
    })
    .await
}

/// Inserts a persona without the application pre-check.
///
/// The unique index still rejects a duplicate email, which is reported as
/// `EmailAlreadyExists`. Handlers go through [`create`].
#[doc(hidden)]
pub async fn insert(db: &DatabaseConnection, new_persona: NewPersona) -> anyhow::Result<Persona> {
    let email = new_persona.email.clone();
    new_persona
        .into_active_model()
        .insert(db)
        .await
        .map(Persona::from)
        .map_err(|e| conflict_or_db_error(e, &email))
}

/// Generates `count` synthetic personas and inserts them in one transaction.
pub async fn populate(
    db: &DatabaseConnection,
    generator: &PersonaGenerator,
    count: u64,
) -> anyhow::Result<u64> {
    populate_at(db, generator, count, today()).await
}

pub async fn populate_at(
    db: &DatabaseConnection,
    generator: &PersonaGenerator,
    count: u64,
    today: NaiveDate,
) -> anyhow::Result<u64> {
    observed("populate", async move {
        if count == 0 {
            return Ok(0);
        }

        let taken: HashSet<String> = persona::Entity::find()
            .select_only()
            .column(persona::Column::Email)
            .into_tuple::<String>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let personas = generator.generate(count as usize, today, &taken);
        let inserted = personas.len() as u64;

        let txn = db.begin().await?;
        let mut result = Ok(());
        for chunk in personas.chunks(INSERT_CHUNK) {
            result = persona::Entity::insert_many(
                chunk.iter().cloned().map(NewPersona::into_active_model),
            )
            .exec_without_returning(&txn)
            .await
            .map(|_| ());
            if result.is_err() {
                break;
            }
        }
        finish(txn, result, "<synthetic batch>").await?;

        metrics::record_personas_created("populate", inserted);
        tracing::info!(
            inserted,
            locale = %generator.locale(),
            "synthetic personas inserted"
        );
        Ok(inserted)
    })
    .await
}

/// Persona count per email domain. Emails without `@` are skipped.
pub async fn domain_stats(db: &DatabaseConnection) -> anyhow::Result<BTreeMap<String, u64>> {
    observed("domain_stats", async move {
        let emails = persona::Entity::find()
            .select_only()
            .column(persona::Column::Email)
            .into_tuple::<String>()
            .all(db)
            .await?;

        Ok(stats::count_domains(emails.iter().map(String::as_str)))
    })
    .await
}

pub async fn age_stats(db: &DatabaseConnection) -> anyhow::Result<AgeStats> {
    age_stats_at(db, today()).await
}

/// Age statistics as of `today`, ignoring personas without a birth date.
pub async fn age_stats_at(db: &DatabaseConnection, today: NaiveDate) -> anyhow::Result<AgeStats> {
    observed("age_stats", async move {
        let birth_dates = persona::Entity::find()
            .select_only()
            .column(persona::Column::BirthDate)
            .filter(persona::Column::BirthDate.is_not_null())
            .into_tuple::<NaiveDate>()
            .all(db)
            .await?;

        Ok(stats::compute_age_stats(birth_dates, today))
    })
    .await
}

/// Personas whose first name, last name or email contains `term`.
pub async fn search(db: &DatabaseConnection, term: &str) -> anyhow::Result<Vec<Persona>> {
    observed("search", async move {
        let personas = persona::Entity::find()
            .filter(
                Condition::any()
                    .add(persona::Column::FirstName.contains(term))
                    .add(persona::Column::LastName.contains(term))
                    .add(persona::Column::Email.contains(term)),
            )
            .order_by_asc(persona::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Persona::from)
            .collect();

        Ok(personas)
    })
    .await
}

pub async fn list(db: &DatabaseConnection, skip: u64, limit: u64) -> anyhow::Result<Vec<Persona>> {
    observed("list", async move {
        let personas = persona::Entity::find()
            .order_by_asc(persona::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await?
            .into_iter()
            .map(Persona::from)
            .collect();

        Ok(personas)
    })
    .await
}

pub async fn get(db: &DatabaseConnection, id: i32) -> anyhow::Result<Persona> {
    observed("get", async move {
        match persona::Entity::find_by_id(id).one(db).await? {
            Some(model) => Ok(Persona::from(model)),
            None => Err(PersonaError::PersonaNotFound(id).into()),
        }
    })
    .await
}

/// Applies the supplied fields only. A changed email is checked against
/// every other persona before writing.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    patch: PersonaPatch,
) -> anyhow::Result<Persona> {
    observed("update", async move {
        let Some(existing) = persona::Entity::find_by_id(id).one(db).await? else {
            return Err(PersonaError::PersonaNotFound(id).into());
        };

        if patch.is_empty() {
            return Ok(Persona::from(existing));
        }

        if let Some(email) = patch.email.as_deref()
            && email != existing.email
            && email_taken(db, email, Some(id)).await?
        {
            return Err(PersonaError::EmailAlreadyExists(email.to_string()).into());
        }

        let email = patch
            .email
            .clone()
            .unwrap_or_else(|| existing.email.clone());
        let mut active: persona::ActiveModel = existing.into();
        patch.apply(&mut active);

        let persona = match active.update(db).await {
            Ok(model) => Persona::from(model),
            // Deleted between the lookup and the write
            Err(DbErr::RecordNotUpdated) => return Err(PersonaError::PersonaNotFound(id).into()),
            Err(e) => return Err(conflict_or_db_error(e, &email)),
        };
        tracing::info!(id, "persona updated");
        Ok(persona)
    })
    .await
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> anyhow::Result<()> {
    observed("delete", async move {
        let result = persona::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(PersonaError::PersonaNotFound(id).into());
        }

        metrics::record_personas_deleted("single", 1);
        tracing::info!(id, "persona deleted");
        Ok(())
    })
    .await
}

/// Deletes every persona and returns how many were removed.
pub async fn reset(db: &DatabaseConnection) -> anyhow::Result<u64> {
    observed("reset", async move {
        let result = persona::Entity::delete_many().exec(db).await?;

        metrics::record_personas_deleted("reset", result.rows_affected);
        tracing::warn!(deleted = result.rows_affected, "all personas deleted");
        Ok(result.rows_affected)
    })
    .await
}

pub async fn count(db: &DatabaseConnection) -> anyhow::Result<u64> {
    observed("count", async move { Ok(persona::Entity::find().count(db).await?) }).await
}
