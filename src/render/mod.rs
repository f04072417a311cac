//! Text views: list cards, the detail page and the not-found page.

mod card;
mod detail;

use std::fmt::{self, Write};

use colored::Colorize;

pub use card::{card, detailed_card};
pub use detail::{detail, not_found, DetailState};

use crate::route::View;
use crate::status::Status;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Tree cards instead of one-line cards.
    pub details: bool,
    pub max_card_tags: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            details: false,
            max_card_tags: 8,
        }
    }
}

/// Renders whatever a route resolved to, with the matching status line.
pub fn render_view(view: View<'_>, options: &RenderOptions, state: &DetailState) -> (String, Status) {
    match view {
        View::List(mods) => {
            let body = collect(|out| {
                for m in mods {
                    if options.details {
                        out.write_str(&detailed_card(m, options))?;
                    } else {
                        out.write_str(&card(m, options))?;
                    }
                }
                Ok(())
            });
            (body, Status::Showing(mods.len()))
        }
        View::Detail(m) => (detail(m, state), Status::Viewing(m.display_name().to_string())),
        View::NotFound(id) => (not_found(id), Status::NotFound),
    }
}

pub fn status_line(status: &Status) -> String {
    if status.is_failure() {
        status.to_string().red().to_string()
    } else {
        status.to_string().dimmed().to_string()
    }
}

/// Writing into a `String` never fails, so the result is dropped here once.
fn collect(f: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    let _ = f(&mut out);
    out
}

/// Box-drawing pieces shared by the tree layouts.
struct Glyphs {
    title_corner: boxy::Char,
    title_side_h: String,
    title_side_v: boxy::Char,
    title_branch: boxy::Char,
    branch_more: String,
    branch_done: String,
    node: boxy::Char,
    down_branch: String,
    branch_v: String,
}

impl Glyphs {
    fn new() -> Self {
        Self {
            title_corner: boxy::Char::upper_left(boxy::Weight::Thick),
            title_side_h: boxy::Char::horizontal(boxy::Weight::Thick).to_string(),
            title_side_v: boxy::Char::vertical(boxy::Weight::Thick),
            title_branch: boxy::Char::right_tee(boxy::Weight::Thick).down(boxy::Weight::Normal),
            branch_more: boxy::Char::right_tee(boxy::Weight::Normal).to_string(),
            branch_done: boxy::Char::lower_left(boxy::Weight::Normal).to_string(),
            node: boxy::Char::left_half(boxy::Weight::Normal),
            down_branch: boxy::Char::down_tee(boxy::Weight::Normal).to_string(),
            branch_v: boxy::Char::vertical(boxy::Weight::Normal).to_string(),
        }
    }

    fn title(&self, out: &mut String, title: &str, styled: impl fmt::Display) -> fmt::Result {
        let width = title.chars().count() + 2;
        writeln!(
            out,
            "{}{}{}",
            self.title_corner,
            self.title_side_h.repeat(width),
            self.title_corner.rotate_cw(1)
        )?;
        writeln!(out, "{} {} {}", self.title_side_v, styled, self.title_side_v)?;
        writeln!(
            out,
            "{}{}{}",
            self.title_branch,
            self.title_side_h.repeat(width),
            self.title_corner.rotate_cw(2)
        )
    }

    fn branch(&self, last: bool) -> &str {
        if last {
            &self.branch_done
        } else {
            &self.branch_more
        }
    }

    /// Continuation column under a branch: a vertical bar unless the branch was the last.
    fn gutter(&self, last: bool) -> &str {
        if last {
            " "
        } else {
            &self.branch_v
        }
    }
}
