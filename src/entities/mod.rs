pub mod cached_response;
pub mod mod_snapshot;
pub mod prelude;
