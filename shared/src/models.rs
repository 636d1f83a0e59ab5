use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named ratings attached to a municipality. All of them are small decimals
/// (the overall average tops out around 25, the environmental ones around 8).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    pub vegetation: Option<f64>,
    pub area: Option<f64>,
    pub relief: Option<f64>,
    pub insalubrity: Option<f64>,
    pub per_quarter: [Option<f64>; 4],
    pub total_per_quarter: [Option<f64>; 4],
    pub average: Option<f64>,
}

/// Land and registry (CAR) attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandAttributes {
    pub city_area: Option<f64>,
    pub georeferenced_area: Option<f64>,
    pub georeferenced_percent: Option<f64>,
    pub property_count: Option<f64>,
    pub car_area_total: Option<f64>,
    pub car_area_mean: Option<f64>,
    pub car_perimeter_total: Option<f64>,
    pub car_perimeter_mean: Option<f64>,
    pub max_perimeter_area: Option<f64>,
}

/// One row of the pricing dataset, with every numeric column already
/// converted. `None` means the column was not present in the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityRecord {
    pub name: String,
    pub code: Option<u64>,
    pub uf: Option<String>,
    pub population: Option<u64>,
    pub valuation_by_area: Option<f64>,
    pub valuation_by_perimeter: Option<f64>,
    pub mean_value: Option<f64>,
    pub mean_car_value: Option<f64>,
    pub mean_car_perimeter_value: Option<f64>,
    pub quality: QualityScores,
    pub land: LandAttributes,
}

impl MunicipalityRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn population_or_zero(&self) -> f64 {
        self.population.unwrap_or(0) as f64
    }

    pub fn valuation_by_area_or_zero(&self) -> f64 {
        self.valuation_by_area.unwrap_or(0.0)
    }

    pub fn average_rating_or_zero(&self) -> f64 {
        self.quality.average.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Strategy {
    Economic,
    Quality,
    Growth,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Economic, Strategy::Quality, Strategy::Growth];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Economic => "Econômico",
            Strategy::Quality => "Qualidade",
            Strategy::Growth => "Crescimento",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = String;

    // Accepts the English names and the Portuguese labels, with or without accents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::utils::normalize_text(s.trim()).as_str() {
            "economic" | "economico" => Ok(Strategy::Economic),
            "quality" | "qualidade" => Ok(Strategy::Quality),
            "growth" | "crescimento" => Ok(Strategy::Growth),
            _ => Err(format!(
                "Unknown strategy '{}'. Use 'economic', 'quality' or 'growth'.",
                s
            )),
        }
    }
}

/// Importance sliders shown next to the recommendation form. They are
/// carried along with the preferences but the score uses fixed weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionWeights {
    pub budget: u8,
    pub quality: u8,
    pub population: u8,
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            budget: 7,
            quality: 8,
            population: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceSet {
    /// `None` means no budget constraint.
    pub budget_ceiling: Option<f64>,
    pub target_population: u64,
    pub strategy: Strategy,
    #[serde(default)]
    pub criterion_weights: CriterionWeights,
}

impl PreferenceSet {
    pub fn new(budget_ceiling: Option<f64>, target_population: u64, strategy: Strategy) -> Self {
        Self {
            budget_ceiling,
            target_population,
            strategy,
            criterion_weights: CriterionWeights::default(),
        }
    }

    /// The ceiling to score against, if it is a usable positive amount.
    pub fn effective_budget(&self) -> Option<f64> {
        self.budget_ceiling.filter(|b| b.is_finite() && *b > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Econômico".parse::<Strategy>().unwrap(), Strategy::Economic);
        assert_eq!("economic".parse::<Strategy>().unwrap(), Strategy::Economic);
        assert_eq!("QUALIDADE".parse::<Strategy>().unwrap(), Strategy::Quality);
        assert_eq!(" growth ".parse::<Strategy>().unwrap(), Strategy::Growth);
        assert!("luxury".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_effective_budget() {
        let mut prefs = PreferenceSet::new(Some(10.0), 1, Strategy::Economic);
        assert_eq!(prefs.effective_budget(), Some(10.0));
        prefs.budget_ceiling = Some(0.0);
        assert_eq!(prefs.effective_budget(), None);
        prefs.budget_ceiling = None;
        assert_eq!(prefs.effective_budget(), None);
    }

    #[test]
    fn test_record_defaults() {
        let record = MunicipalityRecord::new("Maceió");
        assert_eq!(record.population_or_zero(), 0.0);
        assert_eq!(record.valuation_by_area_or_zero(), 0.0);
        assert_eq!(record.average_rating_or_zero(), 0.0);
    }

    #[test]
    fn test_preferences_from_json_default_weights() {
        let prefs: PreferenceSet = serde_json::from_str(
            r#"{"budget_ceiling": null, "target_population": 50000, "strategy": "Growth"}"#,
        )
        .unwrap();
        assert_eq!(prefs.strategy, Strategy::Growth);
        assert_eq!(prefs.budget_ceiling, None);
        assert_eq!(prefs.criterion_weights, CriterionWeights::default());
    }
}
