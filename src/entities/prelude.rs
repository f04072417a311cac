pub use super::cached_response::Entity as CachedResponse;
pub use super::mod_snapshot::Entity as ModSnapshot;
