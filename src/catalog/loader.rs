use sea_orm::DatabaseConnection;
use tracing::info;

use super::fetch::CatalogClient;
use super::snapshot::{load_snapshot, save_snapshot};
use super::source::JsonSource;
use crate::model::Mod;
use crate::status::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Show the snapshot first, then always fetch fresh data.
    Background,
    /// Never touch the network.
    CacheOnly,
}

/// Receives every intermediate state of a load, newest last.
pub trait Presenter {
    fn present(&mut self, mods: &[Mod], status: Status);

    fn status(&mut self, status: Status);
}

/// Presents the stored snapshot, or reports that a fetch is starting when
/// there is none. Never touches the network.
pub async fn present_cached<P>(db: &DatabaseConnection, presenter: &mut P) -> Option<Vec<Mod>>
where
    P: Presenter + ?Sized,
{
    match load_snapshot(db).await {
        Some(snapshot) => {
            info!("Loaded {} mods from cache", snapshot.mods.len());
            presenter.present(&snapshot.mods, Status::LoadedFromCache);
            Some(snapshot.mods)
        }
        None => {
            presenter.status(Status::Fetching);
            None
        }
    }
}

/// Fetches the catalog again and stores it as the new snapshot. `None` when
/// the fetch yields no mods.
pub async fn refresh_mods<S>(
    db: &DatabaseConnection,
    client: &CatalogClient<S>,
    modlist_url: &str,
) -> Option<Vec<Mod>>
where
    S: JsonSource,
{
    match client.fetch_mods_fresh(modlist_url).await {
        Some(fresh) if !fresh.is_empty() => {
            save_snapshot(db, &fresh).await;
            Some(fresh)
        }
        _ => None,
    }
}

/// Cache-then-refresh: presents the stored snapshot before the fetch starts,
/// then presents the fresh catalog when it yields anything. Returns the mods
/// that were presented last.
pub async fn load_mods<S, P>(
    db: &DatabaseConnection,
    client: &CatalogClient<S>,
    modlist_url: &str,
    policy: RefreshPolicy,
    presenter: &mut P,
) -> Vec<Mod>
where
    S: JsonSource,
    P: Presenter + ?Sized,
{
    let cached = present_cached(db, presenter).await;

    if policy == RefreshPolicy::CacheOnly {
        if cached.is_none() {
            presenter.status(Status::FailedToLoad);
        }
        return cached.unwrap_or_default();
    }

    match refresh_mods(db, client, modlist_url).await {
        Some(fresh) => {
            presenter.present(&fresh, Status::Updated(fresh.len()));
            fresh
        }
        None => match cached {
            Some(mods) => {
                info!("Refresh yielded nothing, keeping cached mods");
                mods
            }
            None => {
                presenter.status(Status::FailedToLoad);
                Vec::new()
            }
        },
    }
}
