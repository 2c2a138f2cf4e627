//! GlucoGrade Core - Spoken glucose reading to food grade
//!
//! This library provides the core functionality for:
//! - Rewriting spelled-out numbers as digits
//! - Extracting a glucose reading from a spoken sentence
//! - Spotting food names in an utterance
//! - Scoring a food's nutrients against the current reading
//! - Loading nutrition tables from CSV

pub mod config;
pub mod extract;
pub mod keywords;
pub mod measurement;
pub mod numbers;
pub mod nutrition;
pub mod runtime;
pub mod session;

mod pipeline;

pub use config::{Config, DEFAULT_BASELINE_GLUCOSE};
pub use extract::{extract_first_number, first_number};
pub use keywords::find_keyword;
pub use measurement::measurement_from_utterance;
pub use numbers::normalize;
pub use nutrition::{
    assess, score, Advice, Assessment, Color, DiabetesType, FoodRecord, GlucoseBand, Grade,
    NutrientError, NutrientVector, NutritionTable, Presentation, ScoreError, TableError, Tier,
    Verdict,
};
pub use pipeline::{analyze_utterance, Pipeline, PipelineError, PipelineResult, Timings, UtteranceAnalysis};
pub use session::Session;

/// Grade the food named in `utterance` against a fresh session
///
/// This is the main entry point for the library.
pub async fn process_utterance(utterance: &str, config: &Config) -> anyhow::Result<PipelineResult> {
    let mut pipeline = Pipeline::from_config(config).await?;
    Ok(pipeline.process(utterance).await?)
}
