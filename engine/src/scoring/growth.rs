// Growth strategy: property density as a proxy for growth potential.
use super::{Explanation, StrategyComponent};
use shared::models::{MunicipalityRecord, Strategy};

pub struct Growth;

impl StrategyComponent for Growth {
    fn strategy(&self) -> Strategy {
        Strategy::Growth
    }

    fn evaluate(&self, record: &MunicipalityRecord) -> Option<f64> {
        let city_area = record.land.city_area.unwrap_or(0.0);
        if city_area <= 0.0 {
            return None;
        }
        let density = record.land.property_count.unwrap_or(0.0) / city_area;
        Some((density * 50.0).min(100.0))
    }

    fn explain(&self, sub_score: f64) -> Explanation {
        Explanation::GrowthPotential(sub_score)
    }
}
