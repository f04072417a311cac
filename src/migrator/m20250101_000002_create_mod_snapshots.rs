use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct ModSnapshotTableMigration;

#[async_trait::async_trait]
impl MigrationTrait for ModSnapshotTableMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModSnapshot::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModSnapshot::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ModSnapshot::Timestamp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ModSnapshot::Data).text().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModSnapshot::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ModSnapshot {
    Table,
    Id,
    Timestamp,
    Data,
}
