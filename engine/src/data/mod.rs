// Dataset access: column catalogue, CSV loading, cached snapshots
pub mod columns;
pub mod csv_loader;
pub mod dataset;

pub use csv_loader::{locate_dataset, MunicipalCsvLoader, RawTable};
pub use dataset::{Dataset, DatasetCache, Overview};
