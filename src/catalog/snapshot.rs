use chrono::{DateTime, Local, TimeZone};
use sea_orm::{prelude::*, ActiveValue, DatabaseConnection, QueryOrder, TransactionTrait};
use tracing::{debug, warn};

use super::cache::now_millis;
use crate::entities::{mod_snapshot, prelude::*};
use crate::model::Mod;

/// The last fully assembled mod list.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub mods: Vec<Mod>,
}

impl Snapshot {
    pub fn taken_at(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.timestamp).single()
    }
}

/// Replaces the stored snapshot. Failures are logged and otherwise ignored.
pub async fn save_snapshot(db: &DatabaseConnection, mods: &[Mod]) {
    if let Err(e) = try_save_snapshot(db, mods).await {
        warn!("Failed to save mod cache: {}", e);
    }
}

async fn try_save_snapshot(db: &DatabaseConnection, mods: &[Mod]) -> crate::Result<()> {
    let data = serde_json::to_string(mods)?;
    let timestamp = now_millis();
    db.transaction::<_, (), DbErr>(|txn| {
        Box::pin(async move {
            ModSnapshot::delete_many().exec(txn).await?;
            let row = mod_snapshot::ActiveModel {
                timestamp: ActiveValue::Set(timestamp),
                data: ActiveValue::Set(data),
                ..Default::default()
            };
            ModSnapshot::insert(row).exec(txn).await?;
            Ok(())
        })
    })
    .await?;
    debug!("Saved snapshot of {} mods", mods.len());
    Ok(())
}

/// Reads the stored snapshot. Missing or unreadable snapshots are `None`.
pub async fn load_snapshot(db: &DatabaseConnection) -> Option<Snapshot> {
    let row = match ModSnapshot::find()
        .order_by_desc(mod_snapshot::Column::Timestamp)
        .one(db)
        .await
    {
        Ok(row) => row?,
        Err(e) => {
            warn!("Failed to read mod cache: {}", e);
            return None;
        }
    };
    match serde_json::from_str(&row.data) {
        Ok(mods) => Some(Snapshot {
            timestamp: row.timestamp,
            mods,
        }),
        Err(e) => {
            warn!("Failed to read mod cache: {}", e);
            None
        }
    }
}

pub async fn clear_snapshot(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let result = ModSnapshot::delete_many().exec(db).await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveModelTrait;

    fn mods(names: &[&str]) -> Vec<Mod> {
        names
            .iter()
            .map(|n| Mod {
                id: n.to_string(),
                name: n.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn latest_snapshot_replaces_previous() {
        let db = crate::util::open_memory_database().await;
        assert!(load_snapshot(&db).await.is_none());

        save_snapshot(&db, &mods(&["a", "b"])).await;
        save_snapshot(&db, &mods(&["c"])).await;

        let snapshot = load_snapshot(&db).await.unwrap();
        assert_eq!(snapshot.mods, mods(&["c"]));
        assert!(snapshot.taken_at().is_some());
        assert_eq!(ModSnapshot::find().all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_snapshot_reads_as_missing() {
        let db = crate::util::open_memory_database().await;
        mod_snapshot::ActiveModel {
            timestamp: ActiveValue::Set(1),
            data: ActiveValue::Set("{oops".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        assert!(load_snapshot(&db).await.is_none());
        assert_eq!(clear_snapshot(&db).await.unwrap(), 1);
    }
}
