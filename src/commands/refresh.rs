use tracing::info;

use super::util::Session;
use crate::catalog;
use crate::render::status_line;
use crate::status::Status;

pub async fn refresh(session: &Session, force: bool) -> crate::Result<()> {
    if force {
        let removed = session.client.cache().clear().await?;
        info!("Dropped {} cached responses", removed);
    }

    eprintln!("{}", status_line(&Status::Fetching));
    match catalog::refresh_mods(&session.db, &*session.client, &session.config.modlist_url).await {
        Some(mods) => {
            eprintln!("{}", status_line(&Status::Updated(mods.len())));
            Ok(())
        }
        None => {
            eprintln!("{}", status_line(&Status::FailedToLoad));
            std::process::exit(1);
        }
    }
}
