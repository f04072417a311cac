use tracing::debug;

use super::source::JsonSource;
use crate::route::encode_component;

pub fn icon_candidate(base: &str, version: &str) -> String {
    format!("{}/{}/icon.png", base, encode_component(version))
}

/// Probes `icon.png` in each version folder, in the given order, and returns
/// the first candidate that answers successfully. Probe errors are skipped.
pub async fn resolve_icon<S>(source: &S, base: &str, versions: &[String]) -> Option<String>
where
    S: JsonSource + ?Sized,
{
    for version in versions {
        let candidate = icon_candidate(base, version);
        match source.probe(&candidate).await {
            Ok(true) => return Some(candidate),
            Ok(false) => debug!("No icon at {}", candidate),
            Err(e) => debug!("Icon probe failed: {}", e),
        }
    }
    None
}
