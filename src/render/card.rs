use std::fmt::Write;

use colored::Colorize;
use itertools::Itertools;

use super::{collect, Glyphs, RenderOptions};
use crate::model::Mod;
use crate::route::Route;

fn card_tags(m: &Mod, limit: usize) -> Vec<String> {
    let mut tags: Vec<String> = m
        .tags
        .iter()
        .take(limit)
        .map(|t| format!("[{}]", t).cyan().to_string())
        .collect();
    if let Some(game_version) = &m.game_version {
        tags.push(format!("[Supports {}]", game_version).green().to_string());
    }
    tags
}

/// One list entry: name, author, the first few tags and the route to its page.
pub fn card(m: &Mod, options: &RenderOptions) -> String {
    collect(|out| {
        writeln!(
            out,
            "- {} {}",
            m.display_name().bold(),
            format!("By: {}", m.display_author()).dimmed()
        )?;
        let tags = card_tags(m, options.max_card_tags);
        if !tags.is_empty() {
            writeln!(out, "  {}", tags.iter().join(" "))?;
        }
        writeln!(out, "  {}", Route::Mod(m.id.clone()).to_string().blue())
    })
}

/// Tree layout of a list entry.
pub fn detailed_card(m: &Mod, options: &RenderOptions) -> String {
    let glyphs = Glyphs::new();
    collect(|out| {
        glyphs.title(out, m.display_name(), m.display_name().bold())?;

        let mut rows: Vec<(&str, String)> = vec![
            ("By:", m.display_author().to_string()),
            ("Icon:", m.icon_url.clone()),
            ("Source:", m.url.clone()),
            ("Page:", Route::Mod(m.id.clone()).to_string()),
        ];
        if let Some(game_version) = &m.game_version {
            rows.push(("Supports:", game_version.clone()));
        }
        if let Some(newest) = m.versions.first() {
            rows.push((
                "Versions:",
                format!("{} (newest {})", m.versions.len(), newest),
            ));
        }

        let tags: Vec<&String> = m.tags.iter().take(options.max_card_tags).collect();
        let row_count = rows.len();
        for (i, (label, value)) in rows.into_iter().enumerate() {
            let last = i + 1 == row_count && tags.is_empty();
            writeln!(
                out,
                "{}{}{} {}",
                glyphs.branch(last),
                glyphs.node,
                label.bold(),
                value
            )?;
        }

        if !tags.is_empty() {
            writeln!(
                out,
                "{}{}{}{}",
                glyphs.branch_done,
                glyphs.down_branch,
                glyphs.node,
                "Tags:".bold()
            )?;
            let mut tags = tags.into_iter().peekable();
            while let Some(tag) = tags.next() {
                let last = tags.peek().is_none();
                writeln!(out, " {}{}{}", glyphs.branch(last), glyphs.node, tag)?;
            }
        }
        Ok(())
    })
}
