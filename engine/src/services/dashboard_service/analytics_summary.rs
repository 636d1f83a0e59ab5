use chrono::Utc;

use crate::analytics::{AnalyticsSummary, InteractionLog};
use crate::config::EngineSettings;

pub fn handle_analytics_summary(
    log: Option<&InteractionLog>,
    settings: &EngineSettings,
) -> Option<AnalyticsSummary> {
    let log = log?;
    log.summary(Utc::now(), settings.analytics.summary_window_days)
}
