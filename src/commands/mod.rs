mod browse;
mod cache;
mod list;
mod refresh;
mod show;
mod util;

pub use browse::browse;
pub use cache::cache;
pub use list::list;
pub use refresh::refresh;
pub use show::{open, show};
pub use util::Session;
