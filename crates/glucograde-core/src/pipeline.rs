//! Main processing pipeline: Utterance → Reading + Food → Assessment

use crate::{
    config::Config,
    keywords::find_keyword,
    measurement::measurement_from_utterance,
    nutrition::{assess, Assessment, FoodRecord, NutritionTable, ScoreError},
    session::Session,
};
use std::sync::Arc;
use std::time::Instant;

/// Pipeline error with actionable context
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No known food mentioned. Say the name of the food you want graded")]
    NoFoodMentioned,

    #[error("Food '{name}' has no nutrition data")]
    UnknownFood { name: String },

    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// What a single utterance contained
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UtteranceAnalysis {
    /// Spoken reading; `None` means the user should repeat it
    pub measurement: Option<f64>,
    /// First known object named in the utterance
    pub keyword: Option<String>,
}

/// Extract the reading and the mentioned object from `utterance`.
///
/// The two extractions share nothing but the input and run as separate
/// blocking tasks; both are joined before returning. A task that panics
/// counts as finding nothing.
pub async fn analyze_utterance(utterance: &str, keywords: Vec<String>) -> UtteranceAnalysis {
    let utterance: Arc<str> = Arc::from(utterance);

    let measurement_task = {
        let utterance = Arc::clone(&utterance);
        tokio::task::spawn_blocking(move || measurement_from_utterance(Some(&*utterance)))
    };
    let keyword_task = {
        let utterance = Arc::clone(&utterance);
        tokio::task::spawn_blocking(move || {
            find_keyword(Some(&*utterance), &keywords).map(str::to_string)
        })
    };

    let (measurement, keyword) = tokio::join!(measurement_task, keyword_task);

    UtteranceAnalysis {
        measurement: measurement.unwrap_or_else(|e| {
            tracing::warn!("Measurement extraction failed: {}", e);
            None
        }),
        keyword: keyword.unwrap_or_else(|e| {
            tracing::warn!("Keyword extraction failed: {}", e);
            None
        }),
    }
}

/// Result from the processing pipeline
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Reading spoken in this utterance, if any
    pub measurement: Option<f64>,
    /// Reading the food was scored against
    pub reference: f64,
    pub food: FoodRecord,
    pub assessment: Assessment,
    pub timings: Timings,
}

/// Processing time breakdown
#[derive(Debug, Clone, Default)]
pub struct Timings {
    pub extraction_us: u64,
    pub scoring_us: u64,
    pub total_us: u64,
}

/// The main GlucoGrade pipeline
pub struct Pipeline {
    config: Config,
    table: NutritionTable,
    keywords: Vec<String>,
    session: Session,
}

impl Pipeline {
    pub fn new(config: &Config, table: NutritionTable) -> Self {
        tracing::info!("Initializing GlucoGrade pipeline");
        tracing::info!("  Baseline glucose: {}", config.baseline_glucose);
        tracing::info!("  Diabetes type: {}", config.diabetes_type.display_name());
        tracing::info!("  Foods loaded: {}", table.len());

        Self {
            keywords: config.keywords_for(&table),
            session: Session::new(config.baseline_glucose),
            config: config.clone(),
            table,
        }
    }

    /// Build from configuration, loading the configured nutrition table
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let table = config.load_table().await?;
        Ok(Self::new(config, table))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn table(&self) -> &NutritionTable {
        &self.table
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a spoken or typed food name to its record
    pub fn resolve_food(&self, name: &str) -> Result<&FoodRecord, PipelineError> {
        self.table
            .find_by_name(name)
            .ok_or_else(|| PipelineError::UnknownFood {
                name: name.to_string(),
            })
    }

    /// Process one utterance.
    ///
    /// A spoken reading replaces the session reading; without one the
    /// previous reading (initially the baseline) is used.
    pub async fn process(&mut self, utterance: &str) -> Result<PipelineResult, PipelineError> {
        let start = Instant::now();

        // Step 1: Extract reading and food name concurrently
        let analysis = analyze_utterance(utterance, self.keywords.clone()).await;
        let extraction_us = start.elapsed().as_micros() as u64;
        tracing::debug!("Utterance analysis took {}µs: {:?}", extraction_us, analysis);

        if let Some(reading) = analysis.measurement {
            self.session.set_reference(reading);
        } else {
            tracing::info!(
                "No reading in utterance, using {}",
                self.session.reference()
            );
        }

        // Step 2: Resolve the food
        let keyword = analysis.keyword.ok_or(PipelineError::NoFoodMentioned)?;
        let food = self.resolve_food(&keyword)?.clone();

        // Step 3: Score
        let t2 = Instant::now();
        let reference = self.session.reference();
        let assessment = assess(&food.nutrients, reference, self.config.diabetes_type)?;
        let scoring_us = t2.elapsed().as_micros() as u64;

        Ok(PipelineResult {
            measurement: analysis.measurement,
            reference,
            food,
            assessment,
            timings: Timings {
                extraction_us,
                scoring_us,
                total_us: start.elapsed().as_micros() as u64,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{Advice, DiabetesType, Grade, Verdict};

    async fn pipeline(config: Config) -> Pipeline {
        Pipeline::from_config(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_analyze_joins_both_results() {
        let keywords = vec!["banana".to_string(), "apple".to_string()];
        let analysis = analyze_utterance("my glucose is ninety and I want an apple", keywords).await;
        assert_eq!(
            analysis,
            UtteranceAnalysis {
                measurement: Some(90.0),
                keyword: Some("apple".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_analyze_finds_nothing() {
        let analysis = analyze_utterance("hello there", vec!["banana".to_string()]).await;
        assert_eq!(analysis, UtteranceAnalysis::default());
    }

    #[tokio::test]
    async fn test_process_grades_food_with_spoken_reading() {
        let mut pipeline = pipeline(Config::default()).await;
        let result = pipeline
            .process("glucose eighty five, can I have broccoli")
            .await
            .unwrap();

        assert_eq!(result.measurement, Some(85.0));
        assert_eq!(result.reference, 85.0);
        assert_eq!(result.food.name, "broccoli");
        // 90 + 0.3 * ((0.4 + 2.6 + 2.8) - (6.6 + 1.7 + 0))
        assert!((result.assessment.score - 89.25).abs() < 1e-9);
        assert!(matches!(
            result.assessment.verdict,
            Verdict::Graded { grade: Grade::BPlus, .. }
        ));
        assert_eq!(pipeline.session().reference(), 85.0);
    }

    #[tokio::test]
    async fn test_process_without_reading_uses_previous() {
        let mut pipeline = pipeline(Config::default()).await;
        let result = pipeline.process("what about a banana").await.unwrap();
        assert_eq!(result.measurement, None);
        assert_eq!(result.reference, 100.0);

        pipeline.process("sixty and a banana").await.unwrap();
        let result = pipeline.process("banana again").await.unwrap();
        assert_eq!(result.reference, 60.0);
    }

    #[tokio::test]
    async fn test_process_type_one_gives_advice() {
        let config = Config {
            diabetes_type: DiabetesType::TypeOne,
            ..Config::default()
        };
        let mut pipeline = pipeline(config).await;
        // low band: 13 + 10 * (51.3 + 21.2 + 15) / (22.9 + 1.5 + 5.7) ≈ 42.07
        let result = pipeline.process("I'm at fifty five. A donut?").await.unwrap();
        assert_eq!(
            result.assessment.verdict,
            Verdict::Advice {
                advice: Advice::LowSnackFirst,
                presentation: Advice::LowSnackFirst.presentation(),
            }
        );
    }

    #[tokio::test]
    async fn test_process_without_food() {
        let mut pipeline = pipeline(Config::default()).await;
        let err = pipeline.process("my glucose is ninety").await.unwrap_err();
        assert!(matches!(err, PipelineError::NoFoodMentioned));
        // the reading is still recorded
        assert_eq!(pipeline.session().reference(), 90.0);
    }

    #[tokio::test]
    async fn test_extra_keyword_without_data() {
        let config = Config {
            extra_keywords: vec!["granola".to_string()],
            ..Config::default()
        };
        let mut pipeline = pipeline(config).await;
        let err = pipeline.process("granola bar").await.unwrap_err();
        assert!(matches!(err, PipelineError::UnknownFood { name } if name == "granola"));
    }

    #[tokio::test]
    async fn test_overlong_reading_does_not_poison_session() {
        let mut pipeline = pipeline(Config::default()).await;
        let result = pipeline
            .process(&format!("{} banana", "9".repeat(400)))
            .await
            .unwrap();
        assert_eq!(result.measurement, None);
        assert_eq!(result.reference, 100.0);

        let result = pipeline.process("banana").await.unwrap();
        assert_eq!(result.reference, 100.0);
    }
}
