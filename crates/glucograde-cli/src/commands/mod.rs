//! CLI subcommands

pub mod analyze;
pub mod config;
pub mod foods;
pub mod score;
pub mod text;

use console::{style, StyledObject};
use glucograde_core::{Color, Verdict};

/// Style `text` in the terminal color closest to a presentation color
pub(crate) fn colored<D>(text: D, color: Color) -> StyledObject<D> {
    match color {
        Color::Green => style(text).green(),
        Color::Olive => style(text).green().dim(),
        Color::Amber => style(text).yellow(),
        Color::Orange => style(text).color256(208),
        Color::Red => style(text).red(),
        Color::Neutral => style(text),
    }
}

/// Render a verdict label with its color
pub(crate) fn verdict_line(verdict: &Verdict) -> String {
    let presentation = verdict.presentation();
    let icon = presentation
        .icon
        .map(|i| format!(" [icon {}]", i))
        .unwrap_or_default();
    format!(
        "{}{}",
        colored(verdict.label(), presentation.color).bold(),
        style(icon).dim()
    )
}
