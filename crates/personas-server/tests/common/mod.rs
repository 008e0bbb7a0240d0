// Shared helpers for persona integration tests
#![allow(dead_code)]

use chrono::NaiveDate;
use personas_migration::{Migrator, MigratorTrait};
use personas_persistence::NewPersona;
use personas_server::model::{AppState, Configuration};
use personas_server::service::generator::{Locale, PersonaGenerator};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;

/// Connections in the test pool, enough for writers to race each other
pub const POOL_SIZE: u32 = 8;

/// A migrated SQLite database living in a temporary directory.
pub struct TestDb {
    pub db: DatabaseConnection,
    _dir: TempDir,
}

pub async fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("personas.db").display()
    );

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(POOL_SIZE)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    TestDb { db, _dir: dir }
}

pub fn app_state(db: &DatabaseConnection) -> AppState {
    AppState::new(
        Configuration::default(),
        db.clone(),
        PersonaGenerator::new(Locale::EsEs, Some(42)),
        None,
    )
}

pub fn new_persona(first_name: &str, last_name: &str, email: &str) -> NewPersona {
    NewPersona {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone: None,
        birth_date: None,
        is_active: true,
        notes: None,
    }
}

pub fn born(persona: NewPersona, birth_date: NaiveDate) -> NewPersona {
    NewPersona {
        birth_date: Some(birth_date),
        ..persona
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
