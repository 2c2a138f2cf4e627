//! In-memory nutrition table
//!
//! Loads food rows of the form
//! `matched_id, food_id, name, carbohydrate, fat, fiber, protein, sugar, added_sugar, serving_weight`
//! and indexes them by `food_id`. Malformed rows are skipped with a warning.

use super::nutrients::NutrientVector;
use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use futures::StreamExt;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;

/// Table shipped with the crate: ten common foods, ids 46-55
const BUILTIN_CSV: &str = include_str!("../../data/nutrition.csv");

const HEADER_MARKER: &str = "matched_nutrition_ID";
const COLUMN_COUNT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Failed to open nutrition table {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read nutrition table: {0}")]
    Read(#[from] csv_async::Error),
}

/// Why a single row was skipped
#[derive(Debug, PartialEq, thiserror::Error)]
enum RowError {
    #[error("expected 10 columns, found {found}")]
    TooFewColumns { found: usize },

    #[error("column {column} is not a number: {value:?}")]
    NotANumber { column: usize, value: String },
}

/// One food in the table
#[derive(Debug, Clone, PartialEq)]
pub struct FoodRecord {
    pub matched_id: u32,
    pub food_id: u32,
    pub name: String,
    pub nutrients: NutrientVector,
}

impl FoodRecord {
    fn from_record(record: &StringRecord) -> Result<Self, RowError> {
        if record.len() < COLUMN_COUNT {
            return Err(RowError::TooFewColumns {
                found: record.len(),
            });
        }

        let field = |column: usize| record.get(column).unwrap_or_default();
        let id = |column: usize| {
            field(column).parse::<u32>().map_err(|_| RowError::NotANumber {
                column,
                value: field(column).to_string(),
            })
        };
        let amount = |column: usize| {
            field(column)
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| RowError::NotANumber {
                    column,
                    value: field(column).to_string(),
                })
        };

        let matched_id = id(0)?;
        let food_id = id(1)?;

        Ok(Self {
            matched_id,
            food_id,
            name: field(2).to_string(),
            nutrients: NutrientVector {
                id: f64::from(food_id),
                carbohydrate: amount(3)?,
                fat: amount(4)?,
                fiber: amount(5)?,
                protein: amount(6)?,
                sugar: amount(7)?,
                added_sugar: amount(8)?,
                serving_weight: Some(amount(9)?),
            },
        })
    }
}

/// Foods indexed by `food_id`
#[derive(Debug, Clone, Default)]
pub struct NutritionTable {
    foods: BTreeMap<u32, FoodRecord>,
}

impl NutritionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse rows from any async reader. Bad rows are skipped; only read errors fail
    pub async fn from_reader<R>(reader: R) -> Result<Self, TableError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut csv = AsyncReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .create_reader(reader);

        let mut table = Self::new();
        let mut skipped = 0usize;
        let mut records = Box::pin(csv.records());
        let mut row = 0usize;

        while let Some(record) = records.next().await {
            let record = record?;
            row += 1;

            if row == 1 && record.get(0).is_some_and(|f| f.eq_ignore_ascii_case(HEADER_MARKER)) {
                tracing::debug!("Skipping nutrition table header row");
                continue;
            }

            match FoodRecord::from_record(&record) {
                Ok(food) => {
                    tracing::trace!("Loaded food {} ({})", food.food_id, food.name);
                    table.insert(food);
                }
                Err(e) => {
                    tracing::warn!("Skipping nutrition row {}: {}", row, e);
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            "Nutrition table parsed: {} foods loaded, {} rows skipped",
            table.len(),
            skipped
        );
        Ok(table)
    }

    pub async fn from_csv_str(csv: &str) -> Result<Self, TableError> {
        Self::from_reader(csv.as_bytes()).await
    }

    /// Load a CSV file from disk
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| TableError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!("Loading nutrition table from {:?}", path);
        Self::from_reader(file).await
    }

    /// The table compiled into the crate
    pub async fn builtin() -> Result<Self, TableError> {
        Self::from_csv_str(BUILTIN_CSV).await
    }

    /// Add or replace a food
    pub fn insert(&mut self, food: FoodRecord) {
        self.foods.insert(food.food_id, food);
    }

    pub fn get(&self, food_id: u32) -> Option<&FoodRecord> {
        self.foods.get(&food_id)
    }

    /// Case-insensitive lookup by food name
    pub fn find_by_name(&self, name: &str) -> Option<&FoodRecord> {
        let name = name.trim();
        self.foods
            .values()
            .find(|food| food.name.eq_ignore_ascii_case(name))
    }

    /// Food names in id order, usable as keywords
    pub fn names(&self) -> Vec<String> {
        self.foods.values().map(|food| food.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoodRecord> {
        self.foods.values()
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "matched_nutrition_ID,food_id,food_name,Carbohydrate (g),Fat (g),Fiber (g),Protein (g),Sugars (g),Added Sugar (g),Serving Weight 1 (g)";

    #[tokio::test]
    async fn test_builtin_table() {
        let table = NutritionTable::builtin().await.unwrap();
        assert_eq!(table.len(), 10);

        let banana = table.get(46).unwrap();
        assert_eq!(banana.name, "banana");
        assert_eq!(banana.nutrients.carbohydrate, 22.8);
        assert_eq!(banana.nutrients.added_sugar, -1.0);
        assert_eq!(banana.nutrients.serving_weight, Some(118.0));
        assert_eq!(banana.nutrients.id, 46.0);
    }

    #[tokio::test]
    async fn test_header_skipped_and_rows_trimmed() {
        let csv = format!("{HEADER}\n 7 , 12 , kiwi , 14.7, 0.5, 3.0, 1.1, 9.0, -1, 69\n");
        let table = NutritionTable::from_csv_str(&csv).await.unwrap();
        assert_eq!(table.len(), 1);

        let kiwi = table.get(12).unwrap();
        assert_eq!(kiwi.matched_id, 7);
        assert_eq!(kiwi.name, "kiwi");
        assert_eq!(kiwi.nutrients.protein, 1.1);
    }

    #[tokio::test]
    async fn test_without_header() {
        let csv = "1,1,rice,28.0,0.3,0.4,2.7,0.1,0,158\n";
        let table = NutritionTable::from_csv_str(csv).await.unwrap();
        assert_eq!(table.get(1).map(|f| f.name.as_str()), Some("rice"));
    }

    #[tokio::test]
    async fn test_bad_rows_skipped() {
        let csv = format!(
            "{HEADER}\n\
             1,1,rice,28.0,0.3,0.4,2.7,0.1,0,158\n\
             2,2,short,1,2,3\n\
             3,3,bread,abc,3.2,2.7,9.0,5.0,4.0,30\n\
             \n\
             4,4,egg,1.1,10.6,0,12.6,1.1,0,50\n"
        );
        let table = NutritionTable::from_csv_str(&csv).await.unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get(2).is_none());
        assert!(table.get(3).is_none());
        assert!(table.get(4).is_some());
    }

    #[tokio::test]
    async fn test_later_row_replaces_earlier() {
        let csv = "1,9,old,1,1,1,1,1,1,1\n2,9,new,2,2,2,2,2,2,2\n";
        let table = NutritionTable::from_csv_str(csv).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(9).unwrap().name, "new");
    }

    #[tokio::test]
    async fn test_find_by_name_and_names() {
        let table = NutritionTable::builtin().await.unwrap();
        assert_eq!(table.find_by_name("Hot Dog").map(|f| f.food_id), Some(52));
        assert!(table.find_by_name("sushi").is_none());

        let names = table.names();
        assert_eq!(names.first().map(String::as_str), Some("banana"));
        assert_eq!(names.last().map(String::as_str), Some("cake"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = NutritionTable::load("/definitely/not/here.csv").await.unwrap_err();
        assert!(matches!(err, TableError::Open { .. }));
    }

    #[test]
    fn test_row_errors() {
        let record = StringRecord::from(vec!["1", "2", "x"]);
        assert_eq!(
            FoodRecord::from_record(&record),
            Err(RowError::TooFewColumns { found: 3 })
        );

        let record = StringRecord::from(vec!["1", "2", "x", "1", "NaN", "1", "1", "1", "1", "1"]);
        assert_eq!(
            FoodRecord::from_record(&record),
            Err(RowError::NotANumber {
                column: 4,
                value: "NaN".to_string()
            })
        );
    }
}
