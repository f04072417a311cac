use std::sync::Arc;

use sea_orm::DbConn;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::catalog::{self, CatalogClient, HttpSource, JsonCache, Presenter, RefreshPolicy};
use crate::config::Config;
use crate::model::Mod;
use crate::render::{self, DetailState, RenderOptions};
use crate::route::{resolve, Route, View};
use crate::status::Status;
use crate::Result as CrateResult;

/// Everything a command needs: the local store, the catalog client and settings.
pub struct Session {
    pub db: DbConn,
    pub client: Arc<CatalogClient<HttpSource>>,
    pub config: Config,
    pub policy: RefreshPolicy,
}

impl Session {
    pub async fn open(config: Config, policy: RefreshPolicy) -> CrateResult<Self> {
        let db = crate::util::open_database().await?;
        let cache = JsonCache::load(&db, config.json_cache_max_age()).await;
        if cache.is_empty() {
            debug!("No cached responses, every catalog file will be fetched");
        }
        let client = CatalogClient::new(HttpSource::new()?, cache, config.placeholder_icon.clone());
        Ok(Self {
            db,
            client: Arc::new(client),
            config,
            policy,
        })
    }

    pub async fn load<P: Presenter + ?Sized>(&self, presenter: &mut P) -> Vec<Mod> {
        debug!("Loading mods from {}", self.config.modlist_url);
        catalog::load_mods(
            &self.db,
            &*self.client,
            &self.config.modlist_url,
            self.policy,
            presenter,
        )
        .await
    }

    /// Runs a catalog refresh on its own task so the caller can keep showing
    /// cached mods meanwhile.
    pub fn spawn_refresh(&self) -> JoinHandle<Option<Vec<Mod>>> {
        let db = self.db.clone();
        let client = Arc::clone(&self.client);
        let modlist_url = self.config.modlist_url.clone();
        tokio::spawn(async move { catalog::refresh_mods(&db, &*client, &modlist_url).await })
    }

    pub fn render_options(&self, details: bool) -> RenderOptions {
        RenderOptions {
            details,
            max_card_tags: self.config.max_card_tags,
        }
    }
}

/// Reports load progress on stderr so stdout only carries the final view.
#[derive(Debug, Default)]
pub struct StatusPrinter;

impl Presenter for StatusPrinter {
    fn present(&mut self, _mods: &[Mod], status: Status) {
        self.status(status);
    }

    fn status(&mut self, status: Status) {
        eprintln!("{}", render::status_line(&status));
    }
}

/// Prints a route's view every time the loader presents mods, so the cached
/// snapshot is on screen while the refresh is still running. A refresh that
/// changes nothing only prints its status.
pub struct RoutePrinter {
    route: Route,
    options: RenderOptions,
    state: DetailState,
    tags: Option<Vec<String>>,
    shown: Option<Vec<Mod>>,
}

impl RoutePrinter {
    pub fn new(route: Route, options: RenderOptions, state: DetailState) -> Self {
        Self {
            route,
            options,
            state,
            tags: None,
            shown: None,
        }
    }

    /// Keeps only mods carrying one of the given tags.
    pub fn with_tags(mut self, tags: Option<Vec<String>>) -> Self {
        self.tags = tags;
        self
    }

    /// Renders the view for `mods`, or `None` when it is what was shown last.
    fn render(&mut self, mods: &[Mod]) -> Option<(String, Status, bool)> {
        let mut mods = mods.to_vec();
        if let Some(tags) = &self.tags {
            mods.retain(|m| tags.iter().any(|t| m.has_tag(t)));
        }
        if self.shown.as_ref() == Some(&mods) {
            return None;
        }
        let view = resolve(&self.route, &mods);
        let is_list = matches!(view, View::List(_));
        let (body, status) = render::render_view(view, &self.options, &self.state);
        self.shown = Some(mods);
        Some((body, status, is_list))
    }
}

impl Presenter for RoutePrinter {
    fn present(&mut self, mods: &[Mod], status: Status) {
        if let Some((body, view_status, is_list)) = self.render(mods) {
            print!("{}", body);
            if !is_list {
                eprintln!("{}", render::status_line(&view_status));
            }
        }
        self.status(status);
    }

    fn status(&mut self, status: Status) {
        eprintln!("{}", render::status_line(&status));
    }
}

/// Prints the view a route resolves to. List views already had their count
/// reported by the loader, so only page views print a status line.
pub fn print_route(route: &Route, mods: &[Mod], options: &RenderOptions, state: &DetailState) -> Status {
    let view = resolve(route, mods);
    let (body, status) = render::render_view(view, options, state);
    print!("{}", body);
    if !matches!(view, View::List(_)) {
        eprintln!("{}", render::status_line(&status));
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, tags: &[&str]) -> Mod {
        Mod {
            id: id.to_string(),
            name: id.to_uppercase(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn cached_view_renders_then_unchanged_refresh_is_quiet() {
        colored::control::set_override(false);
        let mut printer = RoutePrinter::new(Route::List, RenderOptions::default(), DetailState::default());
        let cached = vec![named("a", &[])];

        let (body, status, is_list) = printer.render(&cached).unwrap();
        assert!(body.contains("A"));
        assert_eq!(status, Status::Showing(1));
        assert!(is_list);
        assert!(printer.render(&cached).is_none());

        let fresh = vec![named("a", &[]), named("b", &[])];
        let (body, status, _) = printer.render(&fresh).unwrap();
        assert!(body.contains("B"));
        assert_eq!(status, Status::Showing(2));
    }

    #[test]
    fn tag_filter_applies_to_every_presented_list() {
        colored::control::set_override(false);
        let mut printer = RoutePrinter::new(Route::List, RenderOptions::default(), DetailState::default())
            .with_tags(Some(vec!["CARS".to_string()]));
        let mods = vec![named("a", &["cars"]), named("b", &["maps"])];
        let (_, status, _) = printer.render(&mods).unwrap();
        assert_eq!(status, Status::Showing(1));
    }

    #[test]
    fn detail_route_reports_its_page() {
        colored::control::set_override(false);
        let mut printer = RoutePrinter::new(
            Route::Mod("a".to_string()),
            RenderOptions::default(),
            DetailState::default(),
        );
        let (_, status, is_list) = printer.render(&[named("a", &[])]).unwrap();
        assert_eq!(status, Status::Viewing("A".to_string()));
        assert!(!is_list);
        let (_, status, _) = printer.render(&[]).unwrap();
        assert_eq!(status, Status::NotFound);
    }
}
