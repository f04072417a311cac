use sea_orm_migration::prelude::*;

mod m20250101_000001_create_cached_responses;
mod m20250101_000002_create_mod_snapshots;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_cached_responses::CachedResponseTableMigration),
            Box::new(m20250101_000002_create_mod_snapshots::ModSnapshotTableMigration),
        ]
    }
}
