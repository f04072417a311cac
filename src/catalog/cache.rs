use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use sea_orm::{prelude::*, sea_query::OnConflict, ActiveValue, DatabaseConnection, PaginatorTrait};
use serde_json::Value;
use tracing::{debug, warn};

use crate::entities::{cached_response, prelude::*};

#[derive(Debug, Clone)]
struct CachedJson {
    value: Value,
    fetched_at: i64,
}

/// Flat URL to parsed JSON map, mirrored into the local store.
#[derive(Default)]
pub struct JsonCache {
    entries: Mutex<HashMap<String, CachedJson>>,
    db: Option<DatabaseConnection>,
    max_age: Option<Duration>,
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl JsonCache {
    /// A cache that lives only as long as the process.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads every stored response. Rows that fail to parse are skipped, and a
    /// store that cannot be read yields an empty cache that still writes back.
    pub async fn load(db: &DatabaseConnection, max_age: Option<Duration>) -> Self {
        let mut entries = HashMap::new();
        match CachedResponse::find().all(db).await {
            Ok(rows) => {
                for row in rows {
                    match serde_json::from_str(&row.body) {
                        Ok(value) => {
                            entries.insert(
                                row.url,
                                CachedJson {
                                    value,
                                    fetched_at: row.fetched_at,
                                },
                            );
                        }
                        Err(e) => warn!("Skipping unreadable cached response for {}: {}", row.url, e),
                    }
                }
            }
            Err(e) => warn!("Failed to load JSON cache: {}", e),
        }
        debug!("Loaded {} cached responses", entries.len());
        Self {
            entries: Mutex::new(entries),
            db: Some(db.clone()),
            max_age,
        }
    }

    fn is_fresh(&self, entry: &CachedJson, now: i64) -> bool {
        match self.max_age {
            Some(max_age) => {
                let age = now.saturating_sub(entry.fetched_at);
                age < i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX)
            }
            None => true,
        }
    }

    pub fn get(&self, url: &str) -> Option<Value> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(url)?;
        self.is_fresh(entry, now_millis())
            .then(|| entry.value.clone())
    }

    /// Records a response and persists it. Persistence failures are logged only.
    pub async fn insert(&self, url: &str, value: Value) {
        let fetched_at = now_millis();
        let body = value.to_string();
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(url.to_string(), CachedJson { value, fetched_at });
        }
        let Some(db) = &self.db else {
            return;
        };
        let row = cached_response::ActiveModel {
            url: ActiveValue::Set(url.to_string()),
            body: ActiveValue::Set(body),
            fetched_at: ActiveValue::Set(fetched_at),
        };
        let result = CachedResponse::insert(row)
            .on_conflict(
                OnConflict::column(cached_response::Column::Url)
                    .update_columns([
                        cached_response::Column::Body,
                        cached_response::Column::FetchedAt,
                    ])
                    .to_owned(),
            )
            .exec(db)
            .await;
        if let Err(e) = result {
            warn!("Failed to save JSON cache entry for {}: {}", url, e);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry, in memory and in the store.
    pub async fn clear(&self) -> Result<u64, DbErr> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
        match &self.db {
            Some(db) => clear_stored(db).await,
            None => Ok(0),
        }
    }
}

pub async fn clear_stored(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let result = CachedResponse::delete_many().exec(db).await?;
    debug!("Deleted {} cached responses", result.rows_affected);
    Ok(result.rows_affected)
}

pub async fn count_stored(db: &DatabaseConnection) -> Result<u64, DbErr> {
    CachedResponse::find().count(db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn entries_survive_a_reload() {
        let db = crate::util::open_memory_database().await;
        let cache = JsonCache::load(&db, None).await;
        assert!(cache.is_empty());
        cache.insert("https://h/a.json", json!({ "a": 1 })).await;
        cache.insert("https://h/a.json", json!({ "a": 2 })).await;
        cache.insert("https://h/b.json", json!([1, 2])).await;

        let reloaded = JsonCache::load(&db, None).await;
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("https://h/a.json"), Some(json!({ "a": 2 })));
        assert_eq!(count_stored(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn expired_entries_are_misses() {
        let db = crate::util::open_memory_database().await;
        let row = cached_response::ActiveModel {
            url: ActiveValue::Set("https://h/old.json".to_string()),
            body: ActiveValue::Set("{\"old\":true}".to_string()),
            fetched_at: ActiveValue::Set(now_millis() - 10_000),
        };
        CachedResponse::insert(row).exec(&db).await.unwrap();

        let forever = JsonCache::load(&db, None).await;
        assert!(forever.get("https://h/old.json").is_some());
        let short = JsonCache::load(&db, Some(Duration::from_secs(5))).await;
        assert!(short.get("https://h/old.json").is_none());
    }

    #[tokio::test]
    async fn unreadable_rows_are_skipped() {
        let db = crate::util::open_memory_database().await;
        let row = cached_response::ActiveModel {
            url: ActiveValue::Set("https://h/broken".to_string()),
            body: ActiveValue::Set("{not json".to_string()),
            fetched_at: ActiveValue::Set(0),
        };
        CachedResponse::insert(row).exec(&db).await.unwrap();
        let cache = JsonCache::load(&db, None).await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn clear_empties_memory_and_store() {
        let db = crate::util::open_memory_database().await;
        let cache = JsonCache::load(&db, None).await;
        cache.insert("https://h/a.json", json!(1)).await;
        assert_eq!(cache.clear().await.unwrap(), 1);
        assert!(cache.get("https://h/a.json").is_none());
        assert_eq!(count_stored(&db).await.unwrap(), 0);
    }
}
