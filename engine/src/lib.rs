// Engine library root: dataset loading, scoring, querying and analytics for
// the municipal pricing dashboard.

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod query;
pub mod scoring;
pub mod services;

pub use error::{EngineError, EngineResult};
