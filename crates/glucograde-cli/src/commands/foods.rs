//! Foods command - list the nutrition table

use anyhow::Result;
use console::{style, Term};
use glucograde_core::Config;

pub async fn list(config: &Config) -> Result<()> {
    let term = Term::stdout();
    let table = config.load_table().await?;

    let source = config.database_path.as_deref().unwrap_or("built-in");
    term.write_line(&format!(
        "{} ({} foods, {})",
        style("Nutrition Table").bold(),
        table.len(),
        source
    ))?;
    term.write_line("")?;
    term.write_line(&format!(
        "{}",
        style(format!(
            "  {:>5}  {:<16} {:>7} {:>6} {:>6} {:>7} {:>6} {:>7}",
            "ID", "Name", "Carbs", "Fat", "Fiber", "Protein", "Sugar", "Added"
        ))
        .dim()
    ))?;

    for food in table.iter() {
        let n = &food.nutrients;
        let added = if n.added_sugar < 0.0 {
            "-".to_string()
        } else {
            format!("{:.1}", n.added_sugar)
        };
        term.write_line(&format!(
            "  {:>5}  {:<16} {:>7.1} {:>6.1} {:>6.1} {:>7.1} {:>6.1} {:>7}",
            food.food_id,
            style(&food.name).cyan(),
            n.carbohydrate,
            n.fat,
            n.fiber,
            n.protein,
            n.sugar,
            added
        ))?;
    }

    if !config.extra_keywords.is_empty() {
        term.write_line("")?;
        term.write_line(&format!("{}", style("Extra keywords:").dim()))?;
        for word in &config.extra_keywords {
            term.write_line(&format!("  - {}", word))?;
        }
    }

    Ok(())
}
