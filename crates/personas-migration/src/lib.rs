//! Personas Migration - Schema migrations for the persona table

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_persona;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_persona::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::sea_orm::{ConnectionTrait, Database, Statement};

    use super::*;

    #[tokio::test]
    async fn test_migrator_creates_and_drops_persona_table() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("migration.db").display());
        let db = Database::connect(url).await.unwrap();

        Migrator::up(&db, None).await.unwrap();
        let manager = SchemaManager::new(&db);
        assert!(manager.has_table("persona").await.unwrap());
        assert!(manager.has_column("persona", "email").await.unwrap());

        db.execute(Statement::from_string(
            db.get_database_backend(),
            "INSERT INTO persona (first_name, last_name, email, is_active) VALUES ('a', 'b', 'a@x.com', 1)",
        ))
        .await
        .unwrap();
        let duplicate = db
            .execute(Statement::from_string(
                db.get_database_backend(),
                "INSERT INTO persona (first_name, last_name, email, is_active) VALUES ('c', 'd', 'a@x.com', 1)",
            ))
            .await;
        assert!(duplicate.is_err(), "email index must reject duplicates");

        Migrator::down(&db, None).await.unwrap();
        assert!(!manager.has_table("persona").await.unwrap());
    }
}
