// Handler for dataset loading
use std::sync::Arc;

use crate::data::{Dataset, DatasetCache};
use crate::error::EngineResult;

pub fn handle_load_data(cache: &mut DatasetCache) -> EngineResult<Arc<Dataset>> {
    let loads_before = cache.load_count();
    let dataset = cache.snapshot()?;
    if cache.load_count() > loads_before {
        tracing::info!(
            path = %cache.path().display(),
            municipalities = dataset.len(),
            "Dataset loaded"
        );
    }
    Ok(dataset)
}
