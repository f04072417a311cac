use colored::Colorize;
use sea_orm::DbConn;
use tracing::info;

use crate::catalog::{cache, snapshot};

pub async fn cache(db: &DbConn, clear: bool) -> crate::Result<()> {
    if clear {
        info!("Clearing local caches");
        let responses = cache::clear_stored(db).await?;
        let snapshots = snapshot::clear_snapshot(db).await?;
        println!(
            "Removed {} cached responses and {} mod list snapshot(s).",
            responses.to_string().bold(),
            snapshots.to_string().bold()
        );
        return Ok(());
    }

    match snapshot::load_snapshot(db).await {
        Some(snapshot) => println!(
            "{} {} mods, saved {}",
            "Mod list:".bold(),
            snapshot.mods.len(),
            snapshot
                .taken_at()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "at an unknown time".to_string())
        ),
        None => println!("{} {}", "Mod list:".bold(), "not cached".dimmed()),
    }
    println!(
        "{} {}",
        "Cached responses:".bold(),
        cache::count_stored(db).await?
    );
    println!(
        "{} {}",
        "Store:".bold(),
        crate::util::get_db_path()?.display()
    );
    Ok(())
}
