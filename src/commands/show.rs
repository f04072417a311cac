use tracing::debug;

use super::util::{RoutePrinter, Session};
use crate::render::DetailState;
use crate::route::Route;

/// Prints whatever the route points at, first from the cached mod list and
/// again once the refresh changes it. An unknown mod prints the not-found page.
pub async fn open(session: &Session, route: Route, changelog: bool) -> crate::Result<()> {
    debug!("Dispatching route {}", route);
    let state = if changelog {
        DetailState::expanded_all()
    } else {
        DetailState::default()
    };
    let mut printer = RoutePrinter::new(route, session.render_options(false), state);
    session.load(&mut printer).await;
    Ok(())
}

pub async fn show(session: &Session, mod_id: String, changelog: bool) -> crate::Result<()> {
    open(session, Route::Mod(mod_id), changelog).await
}
