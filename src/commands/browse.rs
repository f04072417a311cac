use colored::Colorize;
use inquire::error::InquireResult;
use inquire::{InquireError, Select};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::util::{print_route, Session, StatusPrinter};
use crate::catalog::{self, RefreshPolicy};
use crate::model::Mod;
use crate::render::{status_line, DetailState};
use crate::route::{resolve, Route, View};
use crate::status::Status;

#[derive(Debug, Clone, PartialEq)]
enum BrowseAction {
    OpenMod(String, String),
    ToggleChangelog(String, bool),
    ShowImport(String),
    Refresh,
    BackToList,
    Quit,
}

impl std::fmt::Display for BrowseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BrowseAction::OpenMod(_, name) => write!(f, "{}", name),
            BrowseAction::ToggleChangelog(version, true) => {
                write!(f, "Hide changelog for {}", version)
            }
            BrowseAction::ToggleChangelog(version, false) => {
                write!(f, "Show changelog for {}", version)
            }
            BrowseAction::ShowImport(_) => write!(f, "Show import URL"),
            BrowseAction::Refresh => write!(f, "Reload catalog"),
            BrowseAction::BackToList => write!(f, "Back to all mods"),
            BrowseAction::Quit => write!(f, "Quit"),
        }
    }
}

trait InterruptedDefault<T> {
    fn with_interrupted_default(self, d: T) -> InquireResult<T>;
}

impl<T> InterruptedDefault<T> for InquireResult<T> {
    fn with_interrupted_default(self, d: T) -> InquireResult<T> {
        match &self {
            Ok(_) => self,
            Err(ie) => match ie {
                InquireError::OperationCanceled | InquireError::OperationInterrupted => Ok(d),
                _ => self,
            },
        }
    }
}

/// Swaps in the refreshed catalog once its task finishes.
async fn settle(refresh: JoinHandle<Option<Vec<Mod>>>, mods: &mut Vec<Mod>) {
    match refresh.await {
        Ok(Some(fresh)) => {
            eprintln!("{}", status_line(&Status::Updated(fresh.len())));
            *mods = fresh;
        }
        Ok(None) if mods.is_empty() => eprintln!("{}", status_line(&Status::FailedToLoad)),
        Ok(None) => info!("Refresh yielded nothing, keeping cached mods"),
        Err(e) => warn!("Catalog refresh task failed: {}", e),
    }
}

/// Interactive list and detail navigation. The current route plays the part
/// of the page hash; Esc on a detail page goes back to the list.
///
/// The cached mod list is browsable straight away while the catalog is
/// fetched on a background task; the fresh list replaces it at the next menu.
pub async fn browse(session: &Session) -> crate::Result<()> {
    let cached = catalog::present_cached(&session.db, &mut StatusPrinter).await;
    let mut mods = cached.unwrap_or_default();
    let mut pending = match session.policy {
        RefreshPolicy::Background => Some(session.spawn_refresh()),
        RefreshPolicy::CacheOnly => {
            if mods.is_empty() {
                eprintln!("{}", status_line(&Status::FailedToLoad));
            }
            None
        }
    };
    if mods.is_empty() {
        if let Some(refresh) = pending.take() {
            settle(refresh, &mut mods).await;
        }
    }

    let options = session.render_options(false);
    let mut route = Route::List;
    let mut state = DetailState::default();

    loop {
        if pending.as_ref().map_or(false, JoinHandle::is_finished) {
            if let Some(refresh) = pending.take() {
                settle(refresh, &mut mods).await;
            }
        }

        debug!("Browsing {}", route);
        let menu: Vec<BrowseAction> = match resolve(&route, &mods) {
            View::List(list) => {
                eprintln!("{}", status_line(&Status::Showing(list.len())));
                let mut entries: Vec<BrowseAction> = list
                    .iter()
                    .map(|m| {
                        let by = format!("by {}", m.display_author()).dimmed();
                        BrowseAction::OpenMod(m.id.clone(), format!("{} {}", m.display_name(), by))
                    })
                    .collect();
                if session.policy == RefreshPolicy::Background {
                    entries.push(BrowseAction::Refresh);
                }
                entries.push(BrowseAction::Quit);
                entries
            }
            View::Detail(m) => {
                print_route(&route, &mods, &options, &state);
                let mut entries: Vec<BrowseAction> = m
                    .versions
                    .iter()
                    .map(|v| BrowseAction::ToggleChangelog(v.clone(), state.is_expanded(v)))
                    .collect();
                entries.push(BrowseAction::ShowImport(m.url.clone()));
                entries.push(BrowseAction::BackToList);
                entries.push(BrowseAction::Quit);
                entries
            }
            View::NotFound(_) => {
                print_route(&route, &mods, &options, &state);
                vec![BrowseAction::BackToList, BrowseAction::Quit]
            }
        };

        let fallback = if route == Route::List {
            BrowseAction::Quit
        } else {
            BrowseAction::BackToList
        };
        let prompt = match &route {
            Route::List => "All mods:".to_string(),
            Route::Mod(id) => format!("{}:", id),
        };
        let choice = tokio::task::block_in_place(|| {
            Select::new(&prompt, menu)
                .with_page_size(15)
                .prompt()
                .with_interrupted_default(fallback)
        })?;

        match choice {
            BrowseAction::OpenMod(id, _) => {
                route = Route::Mod(id);
                state = DetailState::default();
            }
            BrowseAction::ToggleChangelog(version, _) => {
                state.toggle(&version);
            }
            BrowseAction::ShowImport(url) => {
                println!("{} {}", "Import URL:".bold(), url);
            }
            BrowseAction::Refresh => {
                eprintln!("{}", status_line(&Status::Fetching));
                let refresh = pending.take().unwrap_or_else(|| session.spawn_refresh());
                settle(refresh, &mut mods).await;
            }
            BrowseAction::BackToList => {
                route = Route::List;
            }
            BrowseAction::Quit => {
                if let Some(refresh) = pending.take() {
                    refresh.abort();
                }
                println!("Exiting...");
                break;
            }
        }
    }
    Ok(())
}
