// Loaded dataset snapshots and the cache that serves them.
use serde::Serialize;
use shared::models::MunicipalityRecord;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::csv_loader::MunicipalCsvLoader;
use crate::error::EngineResult;

/// An immutable set of records, shared by reference for the duration of a
/// scoring or query pass.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<MunicipalityRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub municipality_count: usize,
    /// Mean of the available overall ratings, `None` when there are none.
    pub mean_rating: Option<f64>,
    pub total_valuation_by_area: f64,
    pub total_valuation_by_perimeter: f64,
}

impl Dataset {
    pub fn new(records: Vec<MunicipalityRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MunicipalityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, de-duplicated municipality names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.iter().map(|r| r.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn find(&self, name: &str) -> Option<&MunicipalityRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn overview(&self) -> Overview {
        let ratings: Vec<f64> = self.records.iter().filter_map(|r| r.quality.average).collect();
        let mean_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };

        Overview {
            municipality_count: self.records.len(),
            mean_rating,
            total_valuation_by_area: self.records.iter().filter_map(|r| r.valuation_by_area).sum(),
            total_valuation_by_perimeter: self
                .records
                .iter()
                .filter_map(|r| r.valuation_by_perimeter)
                .sum(),
        }
    }
}

// File identity used to decide whether a reload is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl SourceStamp {
    fn read(path: &Path) -> EngineResult<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// Serves the last loaded snapshot until the source file changes.
pub struct DatasetCache {
    path: PathBuf,
    cached: Option<(SourceStamp, Arc<Dataset>)>,
    loads: usize,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
            loads: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of times the file has actually been read.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    pub fn snapshot(&mut self) -> EngineResult<Arc<Dataset>> {
        let stamp = SourceStamp::read(&self.path)?;
        if let Some((cached_stamp, dataset)) = &self.cached {
            if *cached_stamp == stamp {
                tracing::debug!(path = %self.path.display(), "Serving cached dataset snapshot");
                return Ok(Arc::clone(dataset));
            }
            tracing::info!(path = %self.path.display(), "Dataset source changed, reloading");
        }

        let records = MunicipalCsvLoader::load_records_from_csv(&self.path)?;
        let dataset = Arc::new(Dataset::new(records));
        self.loads += 1;
        self.cached = Some((stamp, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Drops the cached snapshot so the next call reloads.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
