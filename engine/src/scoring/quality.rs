// Quality strategy: mean of the vegetation, area and relief ratings.
use super::{Explanation, StrategyComponent};
use shared::models::{MunicipalityRecord, Strategy};

/// Practical ceiling of the environmental ratings.
pub const ENVIRONMENTAL_RATING_CEILING: f64 = 8.0;

pub struct Quality;

impl StrategyComponent for Quality {
    fn strategy(&self) -> Strategy {
        Strategy::Quality
    }

    fn evaluate(&self, record: &MunicipalityRecord) -> Option<f64> {
        let q = &record.quality;
        let sum = q.vegetation.unwrap_or(0.0) + q.area.unwrap_or(0.0) + q.relief.unwrap_or(0.0);
        Some(sum / 3.0 / ENVIRONMENTAL_RATING_CEILING * 100.0)
    }

    fn explain(&self, sub_score: f64) -> Explanation {
        Explanation::EnvironmentalQuality(sub_score)
    }
}
