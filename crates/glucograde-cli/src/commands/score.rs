//! Score command - grade one food against a reading

use anyhow::{Context, Result};
use console::{style, Term};
use glucograde_core::{assess, Config, DiabetesType, GlucoseBand, NutrientVector};

/// What to score
pub enum Target {
    /// Food id or name from the nutrition table
    Food(String),
    /// Comma-separated nutrient vector
    Nutrients(String),
}

pub async fn run(
    config: &Config,
    target: Target,
    glucose: Option<f64>,
    diabetes_type: DiabetesType,
) -> Result<()> {
    let term = Term::stdout();
    let reference = glucose.unwrap_or(config.baseline_glucose);

    let (name, nutrients) = match target {
        Target::Food(food) => {
            let table = config.load_table().await?;
            let record = match food.trim().parse::<u32>() {
                Ok(id) => table.get(id),
                Err(_) => table.find_by_name(&food),
            }
            .with_context(|| format!("Unknown food '{}'. Run `glucograde foods` to list them", food))?;
            (record.name.clone(), record.nutrients.clone())
        }
        Target::Nutrients(values) => (
            "custom nutrients".to_string(),
            parse_nutrients(&values)?,
        ),
    };

    let assessment = assess(&nutrients, reference, diabetes_type)?;

    term.write_line(&format!(
        "{} {}",
        style("Food:").dim(),
        style(&name).bold()
    ))?;
    term.write_line(&format!(
        "{} {} mg/dL ({})",
        style("Glucose:").dim(),
        reference,
        GlucoseBand::for_reference(reference).display_name()
    ))?;
    term.write_line(&format!(
        "{} {:.1}",
        style("Score:").dim(),
        assessment.score
    ))?;
    term.write_line(&format!(
        "{} {}",
        style("Verdict:").dim(),
        super::verdict_line(&assessment.verdict)
    ))?;

    Ok(())
}

/// Parse "1,20,5,3,2,10,5,100" into a nutrient vector
fn parse_nutrients(values: &str) -> Result<NutrientVector> {
    let values = values
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .with_context(|| format!("Not a number in nutrient vector: {:?}", v.trim()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(NutrientVector::from_slice(&values)?)
}
