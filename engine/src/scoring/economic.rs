// Economic strategy: rewards quality per million of area valuation.
use super::{Explanation, StrategyComponent};
use shared::models::{MunicipalityRecord, Strategy};

pub struct Economic;

impl StrategyComponent for Economic {
    fn strategy(&self) -> Strategy {
        Strategy::Economic
    }

    fn evaluate(&self, record: &MunicipalityRecord) -> Option<f64> {
        let valuation = record.valuation_by_area_or_zero();
        if valuation <= 0.0 {
            return None;
        }
        let rating_per_million = record.average_rating_or_zero() / (valuation / 1_000_000.0);
        Some((rating_per_million * 10.0).min(100.0))
    }

    fn explain(&self, sub_score: f64) -> Explanation {
        Explanation::CostBenefit(sub_score)
    }
}
