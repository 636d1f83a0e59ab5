// Engine settings, loaded from the embedded default.json or a user-supplied file.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineSettings {
    pub version: String,
    pub data: DataSettings,
    pub recommendation: RecommendationSettings,
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DataSettings {
    /// Directories searched for the dataset, in order.
    pub search_dirs: Vec<PathBuf>,
    /// File names tried in the first search directory before falling back
    /// to any CSV file.
    pub preferred_files: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RecommendationSettings {
    pub top_n: usize,
    pub default_budget: f64,
    pub default_target_population: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalyticsSettings {
    pub enabled: bool,
    pub log_file: PathBuf,
    pub max_entries: usize,
    pub summary_window_days: i64,
}

const DEFAULT_CONFIG: &str = include_str!("../../assets/config/default.json");

impl EngineSettings {
    pub fn load_default() -> EngineResult<Self> {
        Self::from_json(DEFAULT_CONFIG)
    }

    pub fn load_from_file(path: &Path) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let settings = Self::from_json(&contents)?;
        tracing::info!(path = %path.display(), version = %settings.version, "Loaded engine settings");
        Ok(settings)
    }

    pub fn from_json(contents: &str) -> EngineResult<Self> {
        let settings: EngineSettings = serde_json::from_str(contents)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.data.search_dirs.is_empty() {
            return Err(EngineError::ConfigError(
                "data.search_dirs must list at least one directory".to_string(),
            ));
        }
        if self.recommendation.top_n == 0 {
            return Err(EngineError::ConfigError(
                "recommendation.top_n must be greater than 0".to_string(),
            ));
        }
        if self.analytics.max_entries == 0 {
            return Err(EngineError::ConfigError(
                "analytics.max_entries must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        // Same values as assets/config/default.json
        EngineSettings {
            version: "1.0.0".to_string(),
            data: DataSettings {
                search_dirs: vec![PathBuf::from("dados"), PathBuf::from("data"), PathBuf::from(".")],
                preferred_files: vec![
                    "precificacao_alagoas_NOVO.csv".to_string(),
                    "precificacao_alagoas.csv".to_string(),
                ],
            },
            recommendation: RecommendationSettings {
                top_n: 5,
                default_budget: 1_000_000_000.0,
                default_target_population: 50_000,
            },
            analytics: AnalyticsSettings {
                enabled: true,
                log_file: PathBuf::from("dashboard_analytics.csv"),
                max_entries: 1000,
                summary_window_days: 7,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_matches_default() {
        assert_eq!(EngineSettings::load_default().unwrap(), EngineSettings::default());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = EngineSettings::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let json = DEFAULT_CONFIG.replace("\"top_n\": 5", "\"top_n\": 0");
        let err = EngineSettings::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("top_n"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = EngineSettings::load_from_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }
}
