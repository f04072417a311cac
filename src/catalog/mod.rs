//! Catalog fetching, the two local caches, and the cache-then-refresh load.

pub mod cache;
mod fetch;
mod icon;
pub mod loader;
pub mod snapshot;
pub mod source;
#[cfg(test)]
pub mod testing;

pub use cache::JsonCache;
pub use fetch::CatalogClient;
pub use loader::{load_mods, present_cached, refresh_mods, Presenter, RefreshPolicy};
pub use source::HttpSource;
