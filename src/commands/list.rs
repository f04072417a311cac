use tracing::debug;

use super::util::{RoutePrinter, Session};
use crate::render::DetailState;
use crate::route::Route;

pub async fn list(session: &Session, tags: Option<Vec<String>>, details: bool) -> crate::Result<()> {
    if let Some(tags) = &tags {
        debug!("Filtering mods for tags {:?}", tags);
    }
    let mut printer = RoutePrinter::new(
        Route::List,
        session.render_options(details),
        DetailState::default(),
    )
    .with_tags(tags);
    session.load(&mut printer).await;
    Ok(())
}
