use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Persona::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Persona::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Persona::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Persona::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Persona::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Persona::Phone).string_len(50).null())
                    .col(ColumnDef::new(Persona::BirthDate).date().null())
                    .col(
                        ColumnDef::new(Persona::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Persona::Notes).text().null())
                    .to_owned(),
            )
            .await?;

        // The unique index is the final authority on email uniqueness
        manager
            .create_index(
                Index::create()
                    .name("idx_persona_email")
                    .table(Persona::Table)
                    .col(Persona::Email)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Persona::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Persona {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    BirthDate,
    IsActive,
    Notes,
}
