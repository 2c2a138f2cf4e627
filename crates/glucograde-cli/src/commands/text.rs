//! Text commands - number normalization and reading extraction

use anyhow::Result;
use console::{style, Term};
use glucograde_core::{measurement_from_utterance, normalize as normalize_numbers};

pub fn normalize(text: &str) -> Result<()> {
    let term = Term::stdout();
    term.write_line(&normalize_numbers(text))?;
    Ok(())
}

pub fn measure(text: &str) -> Result<()> {
    let term = Term::stdout();

    match measurement_from_utterance(Some(text)) {
        Some(reading) => {
            term.write_line(&format!(
                "{} Reading: {} mg/dL",
                style("✓").green(),
                style(reading).cyan()
            ))?;
        }
        None => {
            term.write_line(&format!(
                "{} No number found. Please repeat the reading",
                style("✗").red()
            ))?;
        }
    }

    Ok(())
}
