use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A catalog mod as assembled by one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Mod {
    pub id: String,
    pub name: String,
    pub author: String,
    pub tags: Vec<String>,
    pub icon_url: String,
    pub url: String,
    pub game_version: Option<String>,
    pub supported_game_versions: Vec<String>,
    /// Version folders, newest first.
    pub versions: Vec<String>,
    pub manifests: BTreeMap<String, Value>,
    pub polylib: Option<Value>,
}

impl Mod {
    /// Builds the defaults for a catalog entry before any per-mod file is read.
    pub fn from_catalog_entry(id: &str, entry: &Value, placeholder_icon: &str) -> Self {
        Mod {
            id: id.to_string(),
            name: non_empty_str(entry.get("name"))
                .unwrap_or(id)
                .to_string(),
            author: non_empty_str(entry.get("author"))
                .unwrap_or("Unknown")
                .to_string(),
            tags: string_list(entry.get("tags")),
            icon_url: placeholder_icon.to_string(),
            url: non_empty_str(entry.get("url")).unwrap_or("#").to_string(),
            ..Default::default()
        }
    }

    /// Source URL without trailing slashes, or `None` when the entry has no source.
    pub fn source_base(&self) -> Option<&str> {
        if self.url == "#" {
            return None;
        }
        let base = self.url.trim_end_matches('/');
        (!base.is_empty()).then_some(base)
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(Unnamed Mod)"
        } else {
            &self.name
        }
    }

    pub fn display_author(&self) -> &str {
        if self.author.is_empty() {
            "Unknown"
        } else {
            &self.author
        }
    }

    pub fn manifest(&self, version: &str) -> ManifestView<'_> {
        ManifestView::new(self.manifests.get(version))
    }

    pub fn short_description(&self) -> Option<&str> {
        self.polylib
            .as_ref()
            .and_then(|p| non_empty_str(p.get("shortdesc")))
    }

    /// Changelog lines for a version folder. A string changelog is split per
    /// line, trimmed, and stripped of blank lines.
    pub fn changelog(&self, version: &str) -> Vec<String> {
        let candidate = self
            .polylib
            .as_ref()
            .and_then(|p| p.get("changelogs"))
            .and_then(|c| c.get(version));
        match candidate {
            Some(Value::Array(entries)) => entries.iter().map(value_to_text).collect(),
            Some(Value::String(text)) => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Defensive accessor over a version manifest. Reads the `polymod` member
/// when present, otherwise the manifest itself.
#[derive(Debug, Clone, Copy)]
pub struct ManifestView<'a> {
    payload: Option<&'a Value>,
}

impl<'a> ManifestView<'a> {
    pub fn new(manifest: Option<&'a Value>) -> Self {
        let payload = manifest.map(|m| match m.get("polymod") {
            Some(inner) if inner.is_object() => inner,
            _ => m,
        });
        Self { payload }
    }

    fn field(&self, key: &str) -> Option<&'a Value> {
        self.payload.and_then(|p| p.get(key))
    }

    pub fn release_date(&self) -> Option<&'a str> {
        ["releaseDate", "release_date", "date"]
            .iter()
            .find_map(|key| non_empty_str(self.field(key)))
    }

    pub fn game_version(&self) -> Option<&'a str> {
        non_empty_str(self.field("gameVersion"))
    }

    pub fn targets(&self) -> Vec<String> {
        let mut targets = string_list(self.field("targets"));
        if targets.is_empty() {
            if let Some(game_version) = self.game_version() {
                targets.push(game_version.to_string());
            }
        }
        targets
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Arrays are taken element-wise, a single truthy scalar becomes one entry.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(value_to_text).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Number(n)) => vec![n.to_string()],
        Some(Value::Bool(true)) => vec!["true".to_string()],
        _ => Vec::new(),
    }
}
