// Batch ranking of scored records.
use shared::models::{MunicipalityRecord, PreferenceSet};

use super::{score_record, ScoredRecord};

pub const DEFAULT_TOP_N: usize = 5;

/// Scores every record and returns the best `top_n`, highest score first.
///
/// The sort is stable: equal scores keep input order, except that records
/// whose scoring failed go after every successfully scored record with the
/// same score.
pub fn get_recommendations(
    records: &[MunicipalityRecord],
    prefs: &PreferenceSet,
    top_n: usize,
) -> Vec<ScoredRecord> {
    let mut scored: Vec<ScoredRecord> = records.iter().map(|r| score_record(r, prefs)).collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.failed().cmp(&b.failed()))
    });
    scored.truncate(top_n);

    tracing::debug!(
        candidates = records.len(),
        returned = scored.len(),
        strategy = %prefs.strategy,
        "Computed recommendations"
    );
    scored
}
