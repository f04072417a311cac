use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::cache::JsonCache;
use super::icon::resolve_icon;
use super::source::JsonSource;
use crate::model::Mod;
use crate::route::encode_component;
use crate::version;

/// Fetches the catalog through the JSON response cache and assembles mods.
pub struct CatalogClient<S> {
    source: S,
    cache: JsonCache,
    placeholder_icon: String,
}

impl<S: JsonSource> CatalogClient<S> {
    pub fn new(source: S, cache: JsonCache, placeholder_icon: impl Into<String>) -> Self {
        Self {
            source,
            cache,
            placeholder_icon: placeholder_icon.into(),
        }
    }

    pub fn cache(&self) -> &JsonCache {
        &self.cache
    }

    /// Cached GET. Hits never reach the network; failures are logged and
    /// turn into `None`.
    pub async fn fetch_json_cached(&self, url: &str) -> Option<Value> {
        if url.is_empty() {
            return None;
        }
        if let Some(hit) = self.cache.get(url) {
            debug!("Cache hit for {}", url);
            return Some(hit);
        }
        match self.source.get_json(url).await {
            Ok(data) => {
                self.cache.insert(url, data.clone()).await;
                Some(data)
            }
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                None
            }
        }
    }

    /// Reads the catalog index and gathers every mod concurrently, keeping
    /// index order. `None` when the index itself is unavailable.
    pub async fn fetch_mods_fresh(&self, modlist_url: &str) -> Option<Vec<Mod>> {
        let list = self.fetch_json_cached(modlist_url).await?;
        let Some(entries) = list.as_object() else {
            warn!("Mod list at {} is not a JSON object", modlist_url);
            return None;
        };
        info!("Gathering {} mods", entries.len());
        let mods = join_all(
            entries
                .iter()
                .map(|(id, entry)| self.gather_mod(id, entry)),
        )
        .await;
        Some(mods)
    }

    async fn gather_mod(&self, id: &str, entry: &Value) -> Mod {
        let mut result = Mod::from_catalog_entry(id, entry, &self.placeholder_icon);
        let Some(base) = result.source_base().map(str::to_string) else {
            debug!("{} has no source URL", id);
            return result;
        };
        let base = base.as_str();

        let polylib_url = format!("{}/polylib.json", base);
        let latest_url = format!("{}/latest.json", base);
        let listing_url = format!("{}/", base);
        let (polylib, latest, listing) = futures::join!(
            self.fetch_json_cached(&polylib_url),
            self.fetch_json_cached(&latest_url),
            self.fetch_json_cached(&listing_url),
        );
        result.polylib = polylib.filter(|p| !p.is_null());

        if let Some(Value::Object(latest)) = latest {
            let mut game_versions: Vec<String> =
                latest.keys().filter(|k| !k.is_empty()).cloned().collect();
            version::sort_ascending(&mut game_versions);
            result.game_version = game_versions.last().cloned();
            result.supported_game_versions = game_versions;
        }

        let Some(Value::Array(listing)) = listing else {
            return result;
        };
        let folders: Vec<&str> = listing
            .iter()
            .filter(|e| e.get("type").and_then(Value::as_str) == Some("dir"))
            .filter_map(|e| e.get("name").and_then(Value::as_str))
            .filter(|name| !name.starts_with('.'))
            .collect();
        debug!("{}: {} version folders", id, folders.len());

        let manifests = join_all(folders.iter().map(|name| async move {
            let url = format!("{}/{}/manifest.json", base, encode_component(name));
            self.fetch_json_cached(&url)
                .await
                .filter(|m| !m.is_null())
                .map(|m| (name.to_string(), m))
        }))
        .await;

        let mut versions = Vec::with_capacity(manifests.len());
        for (name, manifest) in manifests.into_iter().flatten() {
            result.manifests.insert(name.clone(), manifest);
            versions.push(name);
        }
        version::sort_newest_first(&mut versions);

        if let Some(icon) = resolve_icon(&self.source, base, &versions).await {
            result.icon_url = icon;
        }

        if result.game_version.is_none() {
            let newest = version::newest(
                versions
                    .iter()
                    .filter_map(|v| result.manifest(v).game_version()),
            )
            .map(str::to_string);
            result.game_version = newest;
        }
        result.versions = versions;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::StaticSource;
    use serde_json::json;

    const LIST: &str = "https://cat/modlist.json";

    fn client(source: StaticSource) -> CatalogClient<StaticSource> {
        CatalogClient::new(source, JsonCache::in_memory(), "/images/icon.svg")
    }

    fn full_source() -> StaticSource {
        StaticSource::new()
            .with_json(
                LIST,
                json!({
                    "speedy": {
                        "name": "Speedy",
                        "author": "kit",
                        "tags": ["physics", "fun"],
                        "url": "https://h/speedy/"
                    },
                    "bare": { "name": "Bare" }
                }),
            )
            .with_json(
                "https://h/speedy/polylib.json",
                json!({ "shortdesc": "Go fast", "changelogs": { "0.10.0": "Boost" } }),
            )
            .with_json(
                "https://h/speedy/latest.json",
                json!({ "0.5.0": "0.9.0", "0.5.1": "0.10.0", "": "x" }),
            )
            .with_json(
                "https://h/speedy/",
                json!([
                    { "name": "0.9.0", "type": "dir" },
                    { "name": "0.10.0", "type": "dir" },
                    { "name": "0.2.0", "type": "dir" },
                    { "name": ".github", "type": "dir" },
                    { "name": "README.md", "type": "file" }
                ]),
            )
            .with_json(
                "https://h/speedy/0.9.0/manifest.json",
                json!({ "polymod": { "targets": ["0.5.0"] } }),
            )
            .with_json(
                "https://h/speedy/0.10.0/manifest.json",
                json!({ "polymod": { "targets": ["0.5.1"] } }),
            )
            .with_icon("https://h/speedy/0.9.0/icon.png")
    }

    #[tokio::test]
    async fn gathers_full_mod_records() {
        let client = client(full_source());
        let mods = client.fetch_mods_fresh(LIST).await.unwrap();
        assert_eq!(mods.len(), 2);

        let speedy = &mods[0];
        assert_eq!(speedy.id, "speedy");
        assert_eq!(speedy.tags, ["physics", "fun"]);
        assert_eq!(speedy.versions, ["0.10.0", "0.9.0"]);
        assert!(!speedy.manifests.contains_key("0.2.0"));
        assert_eq!(speedy.supported_game_versions, ["0.5.0", "0.5.1"]);
        assert_eq!(speedy.game_version.as_deref(), Some("0.5.1"));
        assert_eq!(speedy.icon_url, "https://h/speedy/0.9.0/icon.png");
        assert_eq!(speedy.short_description(), Some("Go fast"));

        let bare = &mods[1];
        assert_eq!(bare.id, "bare");
        assert_eq!(bare.url, "#");
        assert_eq!(bare.icon_url, "/images/icon.svg");
        assert!(bare.versions.is_empty());
    }

    #[tokio::test]
    async fn game_version_falls_back_to_manifests() {
        let source = StaticSource::new()
            .with_json(LIST, json!({ "m": { "url": "https://h/m" } }))
            .with_json(
                "https://h/m/",
                json!([
                    { "name": "1.0.0", "type": "dir" },
                    { "name": "1.1.0", "type": "dir" }
                ]),
            )
            .with_json("https://h/m/1.0.0/manifest.json", json!({ "gameVersion": "0.4.10" }))
            .with_json("https://h/m/1.1.0/manifest.json", json!({ "gameVersion": "0.4.9" }));
        let mods = client(source).fetch_mods_fresh(LIST).await.unwrap();
        assert_eq!(mods[0].game_version.as_deref(), Some("0.4.10"));
        assert_eq!(mods[0].icon_url, "/images/icon.svg");
        assert_eq!(mods[0].name, "m");
        assert_eq!(mods[0].author, "Unknown");
    }

    #[tokio::test]
    async fn failing_mod_files_do_not_block_others() {
        let source = StaticSource::new().with_json(
            LIST,
            json!({
                "gone": { "url": "https://dead/gone" },
                "ok": { "name": "Ok" }
            }),
        );
        let mods = client(source).fetch_mods_fresh(LIST).await.unwrap();
        assert_eq!(mods.len(), 2);
        assert!(mods[0].polylib.is_none());
        assert!(mods[0].game_version.is_none());
        assert_eq!(mods[1].name, "Ok");
    }

    #[tokio::test]
    async fn missing_or_malformed_index_is_none() {
        assert!(client(StaticSource::new()).fetch_mods_fresh(LIST).await.is_none());
        let source = StaticSource::new().with_json(LIST, json!(["not", "an", "object"]));
        assert!(client(source).fetch_mods_fresh(LIST).await.is_none());
    }

    #[tokio::test]
    async fn cached_responses_skip_the_source() {
        let client = client(full_source());
        client.fetch_mods_fresh(LIST).await.unwrap();
        client.fetch_mods_fresh(LIST).await.unwrap();
        let requests = client.source.requests();
        let count = |url: &str| requests.iter().filter(|r| r.as_str() == url).count();
        assert_eq!(count(LIST), 1);
        assert_eq!(count("https://h/speedy/0.9.0/manifest.json"), 1);
        // failures are not cached and get retried
        assert_eq!(count("https://h/speedy/0.2.0/manifest.json"), 2);
        assert!(client.fetch_json_cached("").await.is_none());
    }
}
