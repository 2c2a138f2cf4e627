//! Configuration management for GlucoGrade

use crate::nutrition::{DiabetesType, NutritionTable};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Glucose reading (mg/dL) assumed until the user speaks one
pub const DEFAULT_BASELINE_GLUCOSE: f64 = 100.0;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Reference reading used before the user shares one
    pub baseline_glucose: f64,
    /// Type one shows advice instead of letter grades
    pub diabetes_type: DiabetesType,
    /// Nutrition CSV; the built-in table is used when unset
    pub database_path: Option<String>,
    /// Object names to spot in utterances besides the table's food names
    pub extra_keywords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baseline_glucose: DEFAULT_BASELINE_GLUCOSE,
            diabetes_type: DiabetesType::default(),
            database_path: None,
            extra_keywords: vec![],
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            let config: Self = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("No config at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<&str>) -> Result<()> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "glucograde", "glucograde")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if !self.baseline_glucose.is_finite() || self.baseline_glucose < 0.0 {
            anyhow::bail!(
                "baseline_glucose must be a non-negative number, got {}",
                self.baseline_glucose
            );
        }
        Ok(())
    }

    /// Load the configured nutrition table, or the built-in one
    pub async fn load_table(&self) -> Result<NutritionTable> {
        match &self.database_path {
            Some(path) => NutritionTable::load(path)
                .await
                .with_context(|| format!("Failed to load nutrition database {}", path)),
            None => NutritionTable::builtin()
                .await
                .context("Failed to parse built-in nutrition table"),
        }
    }

    /// Keywords to spot in utterances: table food names first, then extras.
    /// Extras already present (ignoring case) are skipped
    pub fn keywords_for(&self, table: &NutritionTable) -> Vec<String> {
        let mut keywords = table.names();
        for extra in &self.extra_keywords {
            if !keywords.iter().any(|k| k.eq_ignore_ascii_case(extra)) {
                keywords.push(extra.clone());
            }
        }
        keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("glucograde-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.baseline_glucose, 100.0);
        assert_eq!(config.diabetes_type, DiabetesType::TypeTwo);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str("diabetes_type = \"type-one\"\n").unwrap();
        assert_eq!(config.diabetes_type, DiabetesType::TypeOne);
        assert_eq!(config.baseline_glucose, DEFAULT_BASELINE_GLUCOSE);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");
        let path_str = path.to_str().unwrap();

        let config = Config {
            baseline_glucose: 200.0,
            diabetes_type: DiabetesType::TypeOne,
            database_path: Some("/tmp/foods.csv".to_string()),
            extra_keywords: vec!["granola".to_string()],
        };
        config.save(Some(path_str)).unwrap();

        let loaded = Config::load(Some(path_str)).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = temp_path("missing");
        let loaded = Config::load(path.to_str()).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_invalid_baseline_rejected() {
        let path = temp_path("invalid");
        std::fs::write(&path, "baseline_glucose = -5.0\n").unwrap();
        assert!(Config::load(path.to_str()).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_keywords_include_extras_once() {
        let config = Config {
            extra_keywords: vec!["granola".to_string(), "banana".to_string()],
            ..Config::default()
        };
        let table = config.load_table().await.unwrap();
        let keywords = config.keywords_for(&table);
        assert_eq!(keywords.len(), table.len() + 1);
        assert_eq!(keywords.last().map(String::as_str), Some("granola"));
    }

    #[tokio::test]
    async fn test_keyword_extras_deduplicated_ignoring_case() {
        let config = Config {
            extra_keywords: vec!["Banana".to_string(), "GRANOLA".to_string(), "granola".to_string()],
            ..Config::default()
        };
        let table = config.load_table().await.unwrap();
        let keywords = config.keywords_for(&table);
        assert_eq!(keywords.len(), table.len() + 1);
        assert!(!keywords.iter().any(|k| k == "Banana"));
    }
}
