use crate::data::{Dataset, Overview};

pub fn handle_overview(dataset: &Dataset) -> Overview {
    let overview = dataset.overview();
    tracing::debug!(
        municipalities = overview.municipality_count,
        mean_rating = ?overview.mean_rating,
        "Computed overview metrics"
    );
    overview
}
