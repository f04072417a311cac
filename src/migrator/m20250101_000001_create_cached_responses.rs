use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct CachedResponseTableMigration;

#[async_trait::async_trait]
impl MigrationTrait for CachedResponseTableMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CachedResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedResponse::Url)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CachedResponse::Body).text().not_null())
                    .col(
                        ColumnDef::new(CachedResponse::FetchedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CachedResponse::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CachedResponse {
    Table,
    Url,
    Body,
    FetchedAt,
}
