use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_MODLIST_URL: &str =
    "https://raw.githubusercontent.com/polytrackmods/PolyLibrary/refs/heads/main/modlist.json";
pub const DEFAULT_PLACEHOLDER_ICON: &str = "/images/icon.svg";

/// Settings loaded from `config.toml` in the user config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog index mapping mod ids to `{name, author, tags, url}`.
    pub modlist_url: String,
    /// Icon shown when no version folder carries an `icon.png`.
    pub placeholder_icon: String,
    /// Tags shown on a list card before the list is cut off.
    pub max_card_tags: usize,
    /// Cached responses older than this are fetched again. Unset keeps them forever.
    pub json_cache_max_age_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modlist_url: DEFAULT_MODLIST_URL.to_string(),
            placeholder_icon: DEFAULT_PLACEHOLDER_ICON.to_string(),
            max_card_tags: 8,
            json_cache_max_age_secs: None,
        }
    }
}

impl Config {
    pub fn json_cache_max_age(&self) -> Option<Duration> {
        self.json_cache_max_age_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> crate::Result<()> {
        url::Url::parse(&self.modlist_url)
            .map_err(|e| format!("Invalid mod list URL {}: {}", self.modlist_url, e))?;
        Ok(())
    }
}

pub fn default_config_path() -> crate::Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or("Failed to get user config directory")?;
    Ok(config_dir.join("polycatalog").join("config.toml"))
}

/// Reads the config at `path`, writing the defaults there first if the file is missing.
pub fn load_or_init(path: &Path) -> crate::Result<Config> {
    if !path.exists() {
        let config = Config::default();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(&config)?)?;
        info!("Created default config at {}", path.display());
        return Ok(config);
    }
    debug!("Reading config from {}", path.display());
    let data = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&data)?;
    config.validate()?;
    Ok(config)
}
