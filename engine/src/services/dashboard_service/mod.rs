// engine/src/services/dashboard_service/mod.rs
// DashboardService owns the settings, the dataset cache and the interaction
// log, and dispatches each request to its handler module.
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::models::{CriterionWeights, Strategy};
use shared::utils::filter_by_search;
use std::path::PathBuf;
use std::sync::Arc;

use crate::analytics::{AnalyticsSummary, InteractionLog};
use crate::config::EngineSettings;
use crate::data::{locate_dataset, Dataset, DatasetCache, Overview};
use crate::error::EngineResult;
use crate::query::{Query, QueryResult};
use crate::scoring::ScoredRecord;

pub mod analytics_summary;
pub mod load_data;
pub mod overview;
pub mod recommend;
pub mod run_query;

/// Recommendation request; unset fields fall back to the settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub budget: Option<f64>,
    pub target_population: Option<u64>,
    pub strategy: Strategy,
    pub top_n: Option<usize>,
    #[serde(default)]
    pub criterion_weights: Option<CriterionWeights>,
}

impl RecommendRequest {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            budget: None,
            target_population: None,
            strategy,
            top_n: None,
            criterion_weights: None,
        }
    }
}

pub struct DashboardService {
    settings: EngineSettings,
    cache: DatasetCache,
    log: Option<InteractionLog>,
}

impl DashboardService {
    /// Locates the dataset through the configured search directories.
    pub fn new(settings: EngineSettings) -> EngineResult<Self> {
        let path = locate_dataset(&settings)?;
        Ok(Self::with_dataset_path(settings, path))
    }

    pub fn with_dataset_path(settings: EngineSettings, path: impl Into<PathBuf>) -> Self {
        let log = settings.analytics.enabled.then(|| {
            InteractionLog::new(
                settings.analytics.log_file.clone(),
                settings.analytics.max_entries,
            )
        });
        DashboardService {
            cache: DatasetCache::new(path),
            settings,
            log,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn interaction_log(&self) -> Option<&InteractionLog> {
        self.log.as_ref()
    }

    fn log_interaction(&self, action: &str, details: serde_json::Value) {
        if let Some(log) = &self.log {
            log.record(action, details);
        }
    }

    pub fn load_data(&mut self) -> EngineResult<Arc<Dataset>> {
        tracing::info!(path = %self.cache.path().display(), "Received load data request");
        load_data::handle_load_data(&mut self.cache)
    }

    pub fn overview(&mut self) -> EngineResult<Overview> {
        tracing::info!("Received overview request");
        let dataset = self.load_data()?;
        let overview = overview::handle_overview(&dataset);
        self.log_interaction("overview", json!({ "municipalities": overview.municipality_count }));
        Ok(overview)
    }

    pub fn recommend(&mut self, request: &RecommendRequest) -> EngineResult<Vec<ScoredRecord>> {
        tracing::info!(
            strategy = %request.strategy,
            budget = ?request.budget,
            target_population = ?request.target_population,
            top_n = ?request.top_n,
            "Received recommend request"
        );
        let dataset = self.load_data()?;
        let recommendations = recommend::handle_recommend(request, &dataset, &self.settings);
        self.log_interaction(
            "recommendations_generated",
            json!({
                "strategy": request.strategy,
                "budget": request.budget,
                "target_population": request.target_population,
                "results": recommendations.len(),
            }),
        );
        Ok(recommendations)
    }

    pub fn run_query(&mut self, query: &Query) -> EngineResult<QueryResult> {
        tracing::info!(
            columns = query.columns.len(),
            grouping = ?query.group_by,
            limit = ?query.limit,
            "Received query request"
        );
        let dataset = self.load_data()?;
        let result = run_query::handle_run_query(query, &dataset)?;
        self.log_interaction(
            "query_executed",
            json!({ "columns": query.columns, "group_by": query.group_by, "rows": result.len() }),
        );
        Ok(result)
    }

    /// Municipality names matching `term`, accent- and case-insensitively.
    pub fn search(&mut self, term: &str) -> EngineResult<Vec<String>> {
        tracing::info!(term, "Received search request");
        let dataset = self.load_data()?;
        let names = dataset.names();
        let found: Vec<String> = filter_by_search(&names, term)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.log_interaction("search", json!({ "term": term, "results": found.len() }));
        Ok(found)
    }

    pub fn analytics_summary(&self) -> Option<AnalyticsSummary> {
        tracing::info!("Received analytics summary request");
        analytics_summary::handle_analytics_summary(self.log.as_ref(), &self.settings)
    }
}
