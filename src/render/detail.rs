use std::collections::HashSet;
use std::fmt::Write;

use colored::Colorize;
use itertools::Itertools;

use super::{collect, Glyphs};
use crate::model::Mod;
use crate::route::Route;

/// Which changelogs are unfolded on a detail page. Each version header flips
/// its own changelog away from the page-wide default.
#[derive(Debug, Clone, Default)]
pub struct DetailState {
    pub expand_all: bool,
    flipped: HashSet<String>,
}

impl DetailState {
    pub fn expanded_all() -> Self {
        Self {
            expand_all: true,
            ..Default::default()
        }
    }

    pub fn is_expanded(&self, version: &str) -> bool {
        self.expand_all != self.flipped.contains(version)
    }

    /// Flips one version's changelog. Returns whether it is now shown.
    pub fn toggle(&mut self, version: &str) -> bool {
        if !self.flipped.remove(version) {
            self.flipped.insert(version.to_string());
        }
        self.is_expanded(version)
    }
}

/// Full page for one mod. Every optional field has a textual fallback.
pub fn detail(m: &Mod, state: &DetailState) -> String {
    let glyphs = Glyphs::new();
    collect(|out| {
        writeln!(out, "{}", format!("<- Back to all mods ({})", Route::List).blue())?;
        glyphs.title(out, m.display_name(), m.display_name().bold())?;

        let mut tags: Vec<String> = m.tags.iter().map(|t| t.cyan().to_string()).collect();
        if let Some(game_version) = &m.game_version {
            tags.push(format!("Supports {}", game_version).green().to_string());
        }
        let rows = [
            ("By:", m.display_author().to_string()),
            ("Tags:", tags.iter().join(", ")),
            ("Icon:", m.icon_url.clone()),
            ("Import:", m.url.clone()),
        ];
        for (i, (label, value)) in rows.iter().enumerate() {
            writeln!(
                out,
                "{}{}{} {}",
                glyphs.branch(i + 1 == rows.len()),
                glyphs.node,
                label.bold(),
                value
            )?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "{}",
            m.short_description().unwrap_or("No description available.")
        )?;
        writeln!(out)?;
        writeln!(out, "{}", "Versions".bold().underline())?;

        if m.versions.is_empty() {
            return writeln!(out, "{}", "No version information available.".dimmed());
        }

        let mut versions = m.versions.iter().peekable();
        while let Some(version) = versions.next() {
            let last = versions.peek().is_none();
            let manifest = m.manifest(version);
            let expanded = state.is_expanded(version);

            let mut header = version.bold().to_string();
            if let Some(date) = manifest.release_date() {
                header.push_str(&format!("  Released: {}", date));
            }
            let targets = manifest.targets();
            if !targets.is_empty() {
                header.push_str(&format!(
                    "  {}",
                    format!("PolyTrack {}", targets.iter().join(", ")).green()
                ));
            }
            writeln!(
                out,
                "{}{}{} {}",
                glyphs.branch(last),
                if expanded {
                    glyphs.down_branch.as_str()
                } else {
                    ""
                },
                glyphs.node,
                header
            )?;

            if !expanded {
                continue;
            }
            let changelog = m.changelog(version);
            let gutter = glyphs.gutter(last);
            if changelog.is_empty() {
                writeln!(
                    out,
                    "{}{}{}{}",
                    gutter,
                    glyphs.branch_done,
                    glyphs.node,
                    "No changelog found.".dimmed()
                )?;
                continue;
            }
            let mut entries = changelog.iter().peekable();
            while let Some(entry) = entries.next() {
                writeln!(
                    out,
                    "{}{}{}{}",
                    gutter,
                    glyphs.branch(entries.peek().is_none()),
                    glyphs.node,
                    entry
                )?;
            }
        }
        Ok(())
    })
}

pub fn not_found(id: &str) -> String {
    collect(|out| {
        writeln!(out, "{}", "Mod not found.".red().bold())?;
        if !id.is_empty() {
            writeln!(out, "No mod with id {} is in the catalog.", id.bold())?;
        }
        writeln!(out, "{}", format!("Back: {}", Route::List).blue())
    })
}
