//! Fixed-order nutrient vectors
//!
//! Layout: `[id, carbohydrate, fat, fiber, protein, sugar, added_sugar, (serving_weight)]`,
//! amounts in grams per 100 g. A negative added sugar means "no data".

use serde::{Deserialize, Serialize};

/// Nutrient vector validation failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NutrientError {
    #[error("Nutrient vector must have 7 or 8 fields, got {len}")]
    WrongLength { len: usize },

    #[error("Nutrient field {index} ({field}) is not a finite number")]
    NotFinite { index: usize, field: &'static str },
}

const FIELD_NAMES: [&str; 8] = [
    "id",
    "carbohydrate",
    "fat",
    "fiber",
    "protein",
    "sugar",
    "added_sugar",
    "serving_weight",
];

/// Macro-nutrient profile of one food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientVector {
    pub id: f64,
    pub carbohydrate: f64,
    pub fat: f64,
    pub fiber: f64,
    pub protein: f64,
    pub sugar: f64,
    /// Negative values mean the source had no data
    pub added_sugar: f64,
    pub serving_weight: Option<f64>,
}

impl NutrientVector {
    /// Build from the positional layout, rejecting wrong lengths and non-finite fields
    pub fn from_slice(values: &[f64]) -> Result<Self, NutrientError> {
        if !(7..=8).contains(&values.len()) {
            return Err(NutrientError::WrongLength { len: values.len() });
        }

        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(NutrientError::NotFinite {
                index,
                field: FIELD_NAMES[index],
            });
        }

        Ok(Self {
            id: values[0],
            carbohydrate: values[1],
            fat: values[2],
            fiber: values[3],
            protein: values[4],
            sugar: values[5],
            added_sugar: values[6],
            serving_weight: values.get(7).copied(),
        })
    }

    /// Positional layout, 8 fields when a serving weight is known
    pub fn to_vec(&self) -> Vec<f64> {
        let mut values = vec![
            self.id,
            self.carbohydrate,
            self.fat,
            self.fiber,
            self.protein,
            self.sugar,
            self.added_sugar,
        ];
        values.extend(self.serving_weight);
        values
    }

    /// Added sugar with the "no data" sentinel treated as zero
    pub fn effective_added_sugar(&self) -> f64 {
        self.added_sugar.max(0.0)
    }

    /// fat + fiber + protein
    pub fn slow_nutrients(&self) -> f64 {
        self.fat + self.fiber + self.protein
    }

    /// carbohydrate + sugar + added sugar
    pub fn fast_nutrients(&self) -> f64 {
        self.carbohydrate + self.sugar + self.effective_added_sugar()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_with_serving_weight() {
        let v = NutrientVector::from_slice(&[46.0, 22.8, 0.3, 2.6, 1.1, 12.2, -1.0, 118.0]).unwrap();
        assert_eq!(v.id, 46.0);
        assert_eq!(v.carbohydrate, 22.8);
        assert_eq!(v.added_sugar, -1.0);
        assert_eq!(v.serving_weight, Some(118.0));
    }

    #[test]
    fn test_from_slice_without_serving_weight() {
        let v = NutrientVector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
        assert_eq!(v.serving_weight, None);
        assert_eq!(v.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            NutrientVector::from_slice(&[1.0, 2.0]),
            Err(NutrientError::WrongLength { len: 2 })
        );
        assert_eq!(
            NutrientVector::from_slice(&[0.0; 9]),
            Err(NutrientError::WrongLength { len: 9 })
        );
    }

    #[test]
    fn test_non_finite_field() {
        let err = NutrientVector::from_slice(&[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0, 7.0]).unwrap_err();
        assert_eq!(err, NutrientError::NotFinite { index: 2, field: "fat" });
        assert!(err.to_string().contains("fat"));
    }

    #[test]
    fn test_negative_added_sugar_is_no_data() {
        let v = NutrientVector::from_slice(&[1.0, 10.0, 1.0, 1.0, 1.0, 5.0, -5.0]).unwrap();
        assert_eq!(v.effective_added_sugar(), 0.0);
        assert_eq!(v.fast_nutrients(), 15.0);
        assert_eq!(v.slow_nutrients(), 3.0);
    }
}
