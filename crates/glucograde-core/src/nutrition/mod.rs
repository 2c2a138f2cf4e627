//! Food nutrient data and adequacy scoring

mod nutrients;
mod score;
mod table;

pub use nutrients::{NutrientError, NutrientVector};
pub use score::{
    assess, score, Advice, Assessment, Color, DiabetesType, GlucoseBand, Grade, Presentation,
    ScoreError, Tier, Verdict, HIGH_GLUCOSE_THRESHOLD, LOW_GLUCOSE_THRESHOLD, MAX_SCORE,
};
pub use table::{FoodRecord, NutritionTable, TableError};
