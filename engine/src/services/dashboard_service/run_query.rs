use crate::data::Dataset;
use crate::error::EngineResult;
use crate::query::{Query, QueryResult};

pub fn handle_run_query(query: &Query, dataset: &Dataset) -> EngineResult<QueryResult> {
    let result = query.run(dataset)?;
    tracing::debug!(
        columns = query.columns.len(),
        grouping = ?query.group_by,
        rows = result.len(),
        "Query executed"
    );
    Ok(result)
}
