//! Config command - manage configuration

use anyhow::Result;
use console::{style, Term};
use glucograde_core::{Config, DiabetesType, NutritionTable};
use std::path::PathBuf;

pub fn show(config: &Config) -> Result<()> {
    let term = Term::stdout();

    term.write_line(&format!("{}", style("GlucoGrade Configuration").bold()))?;
    term.write_line("")?;

    term.write_line(&format!(
        "Baseline glucose: {}",
        style(format!("{} mg/dL", config.baseline_glucose)).cyan()
    ))?;
    term.write_line(&format!(
        "Diabetes type:    {}",
        style(config.diabetes_type.display_name()).cyan()
    ))?;
    term.write_line(&format!(
        "Nutrition table:  {}",
        style(config.database_path.as_deref().unwrap_or("built-in")).cyan()
    ))?;

    if !config.extra_keywords.is_empty() {
        term.write_line("")?;
        term.write_line(&format!("{}", style("Extra Keywords:").dim()))?;
        for word in &config.extra_keywords {
            term.write_line(&format!("  - {}", word))?;
        }
    }

    Ok(())
}

pub fn set_baseline(config: &mut Config, path: Option<&str>, value: f64) -> Result<()> {
    let term = Term::stdout();

    if !value.is_finite() || value < 0.0 {
        term.write_line(&format!(
            "{} Baseline must be a non-negative reading, got {}",
            style("✗").red(),
            value
        ))?;
        return Ok(());
    }

    config.baseline_glucose = value;
    config.save(path)?;

    term.write_line(&format!(
        "{} Baseline glucose set to: {} mg/dL",
        style("✓").green(),
        value
    ))?;

    Ok(())
}

pub fn set_diabetes_type(config: &mut Config, path: Option<&str>, kind: &str) -> Result<()> {
    let term = Term::stdout();

    let diabetes_type = match kind.to_lowercase().replace(['_', ' '], "-").as_str() {
        "type-one" | "type-1" | "one" | "1" => DiabetesType::TypeOne,
        "type-two" | "type-2" | "two" | "2" => DiabetesType::TypeTwo,
        _ => {
            term.write_line(&format!(
                "{} Unknown diabetes type '{}'. Available: type-one, type-two",
                style("✗").red(),
                kind
            ))?;
            return Ok(());
        }
    };

    config.diabetes_type = diabetes_type;
    config.save(path)?;

    term.write_line(&format!(
        "{} Diabetes type set to: {}",
        style("✓").green(),
        diabetes_type.display_name()
    ))?;

    Ok(())
}

pub async fn set_database(config: &mut Config, path: Option<&str>, database: &str) -> Result<()> {
    let term = Term::stdout();

    // Check the file parses before pointing the config at it
    let table = match NutritionTable::load(database).await {
        Ok(table) => table,
        Err(e) => {
            term.write_line(&format!("{} {}", style("✗").red(), e))?;
            return Ok(());
        }
    };

    config.database_path = Some(database.to_string());
    config.save(path)?;

    term.write_line(&format!(
        "{} Nutrition table set to: {}",
        style("✓").green(),
        database
    ))?;

    if table.is_empty() {
        term.write_line(&format!(
            "{} No usable rows found in {}",
            style("⚠").yellow(),
            database
        ))?;
    }

    Ok(())
}

pub fn add_keyword(config: &mut Config, path: Option<&str>, word: &str) -> Result<()> {
    let term = Term::stdout();
    let word = word.trim();

    if word.is_empty() {
        term.write_line(&format!("{} Keyword cannot be empty", style("✗").red()))?;
        return Ok(());
    }

    if config.extra_keywords.iter().any(|k| k == word) {
        term.write_line(&format!(
            "{} '{}' already in keywords",
            style("ℹ").blue(),
            word
        ))?;
        return Ok(());
    }

    config.extra_keywords.push(word.to_string());
    config.save(path)?;

    term.write_line(&format!(
        "{} Added '{}' to keywords",
        style("✓").green(),
        word
    ))?;

    Ok(())
}

pub fn show_path(path: Option<&str>) -> Result<()> {
    let term = Term::stdout();
    let config_path = match path {
        Some(p) => PathBuf::from(p),
        None => Config::default_config_path()?,
    };

    term.write_line(&format!("Config file: {:?}", config_path))?;

    if config_path.exists() {
        term.write_line(&format!("{} File exists", style("✓").green()))?;
    } else {
        term.write_line(&format!(
            "{} File does not exist (using defaults)",
            style("ℹ").blue()
        ))?;
    }

    Ok(())
}
