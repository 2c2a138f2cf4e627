//! Analyze command - grade the food named in an utterance

use anyhow::Result;
use console::{style, Term};
use glucograde_core::{Config, Pipeline, PipelineError};

pub async fn run(config: &Config, text: &str, verbose: bool) -> Result<()> {
    let term = Term::stdout();

    term.write_line(&format!("{} Analyzing...", style("⚙").cyan()))?;

    let mut pipeline = Pipeline::from_config(config).await?;

    let result = match pipeline.process(text).await {
        Ok(result) => result,
        Err(PipelineError::NoFoodMentioned) => {
            let reading = pipeline.session().reference();
            term.write_line(&format!(
                "{} No known food mentioned. Current reading: {} mg/dL",
                style("ℹ").blue(),
                reading
            ))?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match result.measurement {
        Some(reading) => term.write_line(&format!(
            "{} Reading: {} mg/dL",
            style("✓").green(),
            style(reading).cyan()
        ))?,
        None => term.write_line(&format!(
            "{} No reading heard, using {} mg/dL",
            style("⚠").yellow(),
            result.reference
        ))?,
    }

    term.write_line(&format!(
        "{} Food: {}",
        style("✓").green(),
        style(&result.food.name).bold()
    ))?;
    term.write_line("")?;
    term.write_line(&format!(
        "{} (score {:.1})",
        super::verdict_line(&result.assessment.verdict),
        result.assessment.score
    ))?;

    if verbose {
        term.write_line("")?;
        term.write_line(&format!("{}", style("Timings:").dim()))?;
        term.write_line(&format!(
            "  Extraction: {}µs",
            result.timings.extraction_us
        ))?;
        term.write_line(&format!("  Scoring:    {}µs", result.timings.scoring_us))?;
        term.write_line(&format!("  Total:      {}µs", result.timings.total_us))?;
    }

    Ok(())
}
