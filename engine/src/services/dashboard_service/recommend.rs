// Handler for recommendation requests
use shared::models::PreferenceSet;

use super::RecommendRequest;
use crate::config::EngineSettings;
use crate::data::Dataset;
use crate::scoring::{get_recommendations, ScoredRecord};

/// Fills unset request fields from the settings.
pub fn preferences_for(request: &RecommendRequest, settings: &EngineSettings) -> PreferenceSet {
    let defaults = &settings.recommendation;
    let mut prefs = PreferenceSet::new(
        Some(request.budget.unwrap_or(defaults.default_budget)),
        request
            .target_population
            .unwrap_or(defaults.default_target_population),
        request.strategy,
    );
    if let Some(weights) = request.criterion_weights {
        prefs.criterion_weights = weights;
    }
    prefs
}

pub fn handle_recommend(
    request: &RecommendRequest,
    dataset: &Dataset,
    settings: &EngineSettings,
) -> Vec<ScoredRecord> {
    let prefs = preferences_for(request, settings);
    let top_n = request.top_n.unwrap_or(settings.recommendation.top_n);
    let recommendations = get_recommendations(dataset.records(), &prefs, top_n);

    let failed = recommendations.iter().filter(|r| r.failed()).count();
    if failed > 0 {
        tracing::warn!(failed, "Some municipalities could not be scored");
    }
    recommendations
}
