// Usage analytics over a local interaction log.
pub mod interaction_log;

pub use interaction_log::{ActionCount, AnalyticsSummary, InteractionEntry, InteractionLog};
