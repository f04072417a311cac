use crate::{migrator::Migrator, Result};
use sea_orm_migration::prelude::*;
use tracing::{debug, info};
use tracing_unwrap::OptionExt;

fn get_data_dir() -> Result<std::path::PathBuf> {
    let data_dir = dirs::data_dir()
        .expect_or_log("Failed to get user data directory")
        .join("polycatalog");
    if !data_dir.is_dir() {
        info!("Creating data directory");
        std::fs::create_dir_all(&data_dir)?;
    }
    Ok(data_dir)
}

pub fn get_db_path() -> Result<std::path::PathBuf> {
    Ok(get_data_dir()?.join("cache.sqlite"))
}

/// Opens the local cache store, creating and migrating it as needed.
pub async fn open_database() -> Result<sea_orm::DbConn> {
    let database_path = get_db_path()?;
    debug!("Database path: {}", database_path.display());
    let dbpath = format!(
        "sqlite://{}?mode=rwc",
        database_path
            .to_str()
            .expect_or_log("Failed to parse path as UTF-8")
    );
    open_url(&dbpath).await
}

pub async fn open_url(dbpath: &str) -> Result<sea_orm::DbConn> {
    let mut connect_options = sea_orm::ConnectOptions::new(dbpath);
    connect_options.sqlx_logging(false);
    if dbpath.contains(":memory:") {
        connect_options.max_connections(1).min_connections(1);
    }
    let db = sea_orm::SqlxSqliteConnector::connect(connect_options).await?;
    debug!("Applying pending migrations");
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Fresh in-memory store for tests.
#[cfg(test)]
pub async fn open_memory_database() -> sea_orm::DbConn {
    open_url("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open")
}
