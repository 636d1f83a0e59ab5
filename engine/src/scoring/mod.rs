// Recommendation scoring: a fixed-weight sum of budget, population, overall
// quality and one strategy-specific component, clamped to [0, 100].
pub mod economic;
pub mod growth;
pub mod quality;
pub mod recommend;

pub use economic::Economic;
pub use growth::Growth;
pub use quality::Quality;
pub use recommend::get_recommendations;

use serde::Serialize;
use shared::models::{MunicipalityRecord, PreferenceSet, Strategy};
use std::fmt;
use thiserror::Error;

pub const BUDGET_WEIGHT: f64 = 0.30;
pub const POPULATION_WEIGHT: f64 = 0.20;
pub const QUALITY_WEIGHT: f64 = 0.25;
pub const STRATEGY_WEIGHT: f64 = 0.25;

/// Practical ceiling of the overall average rating.
pub const OVERALL_RATING_CEILING: f64 = 25.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("target population must be greater than 0")]
    ZeroTargetPopulation,

    #[error("non-finite {component} component")]
    NonFinite { component: &'static str },
}

/// One line of reasoning per evaluated component, carrying its sub-score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Explanation {
    WithinBudget(f64),
    OverBudget(f64),
    Population(f64),
    OverallQuality(f64),
    CostBenefit(f64),
    EnvironmentalQuality(f64),
    GrowthPotential(f64),
    /// The strategy component could not be computed for this record.
    StrategyUnavailable(Strategy),
    Error(String),
}

impl Explanation {
    pub fn sub_score(&self) -> Option<f64> {
        match self {
            Explanation::WithinBudget(s)
            | Explanation::OverBudget(s)
            | Explanation::Population(s)
            | Explanation::OverallQuality(s)
            | Explanation::CostBenefit(s)
            | Explanation::EnvironmentalQuality(s)
            | Explanation::GrowthPotential(s) => Some(*s),
            Explanation::StrategyUnavailable(_) | Explanation::Error(_) => None,
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Explanation::WithinBudget(s) => write!(f, "Within budget (score: {:.0})", s),
            Explanation::OverBudget(s) => write!(f, "Over budget (score: {:.0})", s),
            Explanation::Population(s) => write!(f, "Population fit (score: {:.0})", s),
            Explanation::OverallQuality(s) => write!(f, "Overall quality (score: {:.0})", s),
            Explanation::CostBenefit(s) => write!(f, "Cost-benefit (score: {:.0})", s),
            Explanation::EnvironmentalQuality(s) => {
                write!(f, "Environmental quality (score: {:.0})", s)
            }
            Explanation::GrowthPotential(s) => write!(f, "Growth potential (score: {:.0})", s),
            Explanation::StrategyUnavailable(strategy) => {
                write!(f, "{} criteria unavailable for this record (score: 0)", strategy)
            }
            Explanation::Error(msg) => write!(f, "Scoring error: {}", msg),
        }
    }
}

/// The strategy-specific part of the score.
pub trait StrategyComponent: Send + Sync {
    fn strategy(&self) -> Strategy;
    /// Sub-score for the record, or `None` when the record lacks the data the
    /// component divides by.
    fn evaluate(&self, record: &MunicipalityRecord) -> Option<f64>;
    fn explain(&self, sub_score: f64) -> Explanation;
}

pub fn component_for(strategy: Strategy) -> Box<dyn StrategyComponent> {
    match strategy {
        Strategy::Economic => Box::new(Economic),
        Strategy::Quality => Box::new(Quality),
        Strategy::Growth => Box::new(Growth),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub name: String,
    pub score: f64,
    pub explanations: Vec<Explanation>,
}

impl ScoredRecord {
    pub fn failed(&self) -> bool {
        self.explanations
            .iter()
            .any(|e| matches!(e, Explanation::Error(_)))
    }
}

fn finite(component: &'static str, value: f64) -> Result<f64, ScoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoreError::NonFinite { component })
    }
}

fn budget_component(valuation: f64, ceiling: f64) -> Explanation {
    if valuation <= ceiling {
        Explanation::WithinBudget(100.0 - (valuation / ceiling * 50.0))
    } else {
        Explanation::OverBudget((50.0 - ((valuation - ceiling) / ceiling * 100.0)).max(0.0))
    }
}

fn try_score(
    record: &MunicipalityRecord,
    prefs: &PreferenceSet,
) -> Result<(f64, Vec<Explanation>), ScoreError> {
    let mut score = 0.0;
    let mut explanations = Vec::with_capacity(4);

    let valuation = record.valuation_by_area_or_zero();
    if let Some(ceiling) = prefs.effective_budget() {
        let explanation = budget_component(valuation, ceiling);
        let sub = finite("budget", explanation.sub_score().unwrap_or(0.0))?;
        score += sub * BUDGET_WEIGHT;
        explanations.push(explanation);
    }

    if prefs.target_population == 0 {
        return Err(ScoreError::ZeroTargetPopulation);
    }
    let target = prefs.target_population as f64;
    let diff = (record.population_or_zero() - target).abs();
    let population_score = finite("population", (100.0 - (diff / target * 100.0)).max(0.0))?;
    score += population_score * POPULATION_WEIGHT;
    explanations.push(Explanation::Population(population_score));

    let quality_score = finite(
        "quality",
        record.average_rating_or_zero() / OVERALL_RATING_CEILING * 100.0,
    )?;
    score += quality_score * QUALITY_WEIGHT;
    explanations.push(Explanation::OverallQuality(quality_score));

    let component = component_for(prefs.strategy);
    match component.evaluate(record) {
        Some(sub) => {
            let sub = finite("strategy", sub)?;
            score += sub * STRATEGY_WEIGHT;
            explanations.push(component.explain(sub));
        }
        None => explanations.push(Explanation::StrategyUnavailable(component.strategy())),
    }

    Ok((score, explanations))
}

/// Scores one record against a preference set. Never fails: an internal
/// error yields a score of 0 with a single error explanation.
pub fn score_record(record: &MunicipalityRecord, prefs: &PreferenceSet) -> ScoredRecord {
    match try_score(record, prefs) {
        Ok((score, explanations)) => ScoredRecord {
            name: record.name.clone(),
            score: score.clamp(0.0, 100.0),
            explanations,
        },
        Err(e) => {
            tracing::warn!(municipality = %record.name, error = %e, "Scoring failed, record scored as 0");
            ScoredRecord {
                name: record.name.clone(),
                score: 0.0,
                explanations: vec![Explanation::Error(e.to_string())],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    fn full_quality_record() -> MunicipalityRecord {
        let mut r = MunicipalityRecord::new("Ideal");
        r.valuation_by_area = Some(5_000_000.0);
        r.population = Some(50_000);
        r.quality.average = Some(25.0);
        r.quality.vegetation = Some(8.0);
        r.quality.area = Some(8.0);
        r.quality.relief = Some(8.0);
        r
    }

    #[test]
    fn test_high_score_for_ideal_record() {
        let prefs = PreferenceSet::new(Some(10_000_000.0), 50_000, Strategy::Quality);
        let scored = score_record(&full_quality_record(), &prefs);
        // 75 * 0.30 + 100 * 0.20 + 100 * 0.25 + 100 * 0.25
        assert_close(scored.score, 92.5);
        assert_eq!(scored.explanations[0], Explanation::WithinBudget(75.0));
        assert_eq!(scored.explanations[1], Explanation::Population(100.0));
        assert_eq!(scored.explanations[2], Explanation::OverallQuality(100.0));
        assert_eq!(scored.explanations[3], Explanation::EnvironmentalQuality(100.0));
    }

    #[test]
    fn test_over_budget_penalty() {
        let mut record = full_quality_record();
        record.valuation_by_area = Some(12_000_000.0);
        let prefs = PreferenceSet::new(Some(10_000_000.0), 50_000, Strategy::Quality);
        let scored = score_record(&record, &prefs);
        assert!(matches!(scored.explanations[0], Explanation::OverBudget(_)));
        assert_close(scored.explanations[0].sub_score().unwrap(), 30.0);

        record.valuation_by_area = Some(30_000_000.0);
        let scored = score_record(&record, &prefs);
        assert_eq!(scored.explanations[0], Explanation::OverBudget(0.0));
    }

    #[test]
    fn test_unconstrained_budget_skips_component() {
        let prefs = PreferenceSet::new(None, 50_000, Strategy::Quality);
        let scored = score_record(&full_quality_record(), &prefs);
        assert_close(scored.score, 70.0);
        assert_eq!(scored.explanations.len(), 3);

        let prefs = PreferenceSet::new(Some(0.0), 50_000, Strategy::Quality);
        assert_close(score_record(&full_quality_record(), &prefs).score, 70.0);
    }

    #[test]
    fn test_missing_valuation_economic_defaults_to_zero() {
        let mut record = full_quality_record();
        record.valuation_by_area = None;
        let prefs = PreferenceSet::new(Some(10_000_000.0), 50_000, Strategy::Economic);
        let scored = score_record(&record, &prefs);
        // budget 100 * 0.30 + 20 + 25 + economic 0
        assert_close(scored.score, 75.0);
        assert!(!scored.failed());
        assert_eq!(
            scored.explanations.last(),
            Some(&Explanation::StrategyUnavailable(Strategy::Economic))
        );
    }

    #[test]
    fn test_zero_target_population_is_a_scoring_failure() {
        let prefs = PreferenceSet::new(Some(10_000_000.0), 0, Strategy::Growth);
        let scored = score_record(&full_quality_record(), &prefs);
        assert_eq!(scored.score, 0.0);
        assert!(scored.failed());
        assert_eq!(scored.explanations.len(), 1);
    }

    #[test]
    fn test_empty_record_stays_in_range() {
        let record = MunicipalityRecord::new("Empty");
        for strategy in Strategy::ALL {
            for budget in [None, Some(0.0), Some(1.0), Some(1e12)] {
                let prefs = PreferenceSet::new(budget, 1, strategy);
                let scored = score_record(&record, &prefs);
                assert!((0.0..=100.0).contains(&scored.score));
            }
        }
    }

    #[test]
    fn test_score_clamped_to_100() {
        let mut record = full_quality_record();
        record.quality.average = Some(80.0);
        let prefs = PreferenceSet::new(Some(10_000_000.0), 50_000, Strategy::Quality);
        assert_eq!(score_record(&record, &prefs).score, 100.0);
    }

    #[test]
    fn test_explanation_display_includes_sub_score() {
        assert_eq!(Explanation::WithinBudget(75.0).to_string(), "Within budget (score: 75)");
        assert_eq!(Explanation::Population(99.6).to_string(), "Population fit (score: 100)");
        assert_eq!(
            Explanation::StrategyUnavailable(Strategy::Growth).to_string(),
            "Crescimento criteria unavailable for this record (score: 0)"
        );
    }

    #[test]
    fn test_component_for_matches_strategy() {
        for strategy in Strategy::ALL {
            assert_eq!(component_for(strategy).strategy(), strategy);
        }
    }
}
