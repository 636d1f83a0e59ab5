use anyhow::Context;
use csv::{ReaderBuilder, StringRecord};
use shared::brazilian_format;
use shared::models::MunicipalityRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::columns::{Column, NumberKind};
use crate::config::EngineSettings;
use crate::error::{EngineError, EngineResult};

/// The dataset exactly as stored: every field is text.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

impl RawTable {
    /// Ordered values of a column by header name. Short rows yield "".
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let pos = self.headers.iter().position(|h| h.trim() == name)?;
        Some(self.rows.iter().map(|r| r.get(pos).unwrap_or("")).collect())
    }

    /// Position of the first alias of `column` present in the headers.
    fn resolve(&self, column: Column) -> Option<usize> {
        column
            .aliases()
            .iter()
            .find_map(|alias| self.headers.iter().position(|h| h.trim() == *alias))
    }
}

// Both paths are resolved when they exist, so "./x.csv" and "x.csv" match.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Finds the dataset file: preferred names in the first search directory,
/// then the first CSV (by name) in each search directory. The interaction
/// log is never picked.
pub fn locate_dataset(settings: &EngineSettings) -> EngineResult<PathBuf> {
    let dirs = &settings.data.search_dirs;

    if let Some(primary) = dirs.first() {
        for file_name in &settings.data.preferred_files {
            let candidate = primary.join(file_name);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Found preferred dataset file");
                return Ok(candidate);
            }
        }
    }

    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        let mut csv_files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().map_or(false, |ext| ext == "csv"))
            .filter(|p| !same_file(p, &settings.analytics.log_file))
            .collect();
        csv_files.sort();
        if let Some(found) = csv_files.into_iter().next() {
            tracing::debug!(path = %found.display(), "Falling back to first CSV in directory");
            return Ok(found);
        }
    }

    Err(EngineError::DatasetNotFound {
        searched: dirs.clone(),
    })
}

pub struct MunicipalCsvLoader;

impl MunicipalCsvLoader {
    pub fn load_raw_table(file_path: &Path) -> EngineResult<RawTable> {
        let file = File::open(file_path)?;
        Self::read_raw_table(BufReader::new(file))
    }

    pub fn read_raw_table<R: Read>(reader: R) -> EngineResult<RawTable> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result
                .with_context(|| format!("Error reading CSV record at line {}", idx + 2))?;
            rows.push(record);
        }
        Ok(RawTable { headers, rows })
    }

    pub fn load_records_from_csv(file_path: &Path) -> EngineResult<Vec<MunicipalityRecord>> {
        let table = Self::load_raw_table(file_path)?;
        let records = Self::records_from_table(&table)?;
        tracing::info!(
            path = %file_path.display(),
            rows = records.len(),
            columns = table.headers.len(),
            "Loaded municipal pricing dataset"
        );
        Ok(records)
    }

    /// Converts every known column through its normalizer. Unknown columns
    /// are ignored; known columns that are absent stay `None`.
    pub fn records_from_table(table: &RawTable) -> EngineResult<Vec<MunicipalityRecord>> {
        let name_pos = table.resolve(Column::Name).ok_or_else(|| {
            EngineError::CsvDataFormatError(format!(
                "Missing municipality name column (expected one of: {})",
                Column::Name.aliases().join(", ")
            ))
        })?;

        let positions: Vec<(Column, Option<usize>)> =
            Column::ALL.iter().map(|c| (*c, table.resolve(*c))).collect();
        for (column, pos) in &positions {
            if pos.is_none() {
                tracing::debug!(column = column.canonical_name(), "Column not present in dataset");
            }
        }

        let records = table
            .rows
            .iter()
            .map(|row| {
                let name = row.get(name_pos).unwrap_or("").trim();
                let mut record =
                    MunicipalityRecord::new(if name.is_empty() { "N/A" } else { name });
                for (column, pos) in &positions {
                    if let Some(pos) = pos {
                        apply_field(&mut record, *column, row.get(*pos).unwrap_or(""));
                    }
                }
                record
            })
            .collect();
        Ok(records)
    }
}

enum FieldValue {
    Text(Option<String>),
    Count(u64),
    Number(Option<f64>),
}

fn convert_field(kind: NumberKind, raw: &str) -> FieldValue {
    match kind {
        NumberKind::Text => {
            let trimmed = raw.trim();
            FieldValue::Text((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        NumberKind::Population => FieldValue::Count(brazilian_format::fix_population(raw)),
        NumberKind::Strict => {
            FieldValue::Number(Some(brazilian_format::convert_brazilian_number(raw)))
        }
        NumberKind::General => {
            let value = brazilian_format::clean_number(raw);
            FieldValue::Number((!value.is_nan()).then_some(value))
        }
    }
}

fn apply_field(record: &mut MunicipalityRecord, column: Column, raw: &str) {
    let value = convert_field(column.kind(), raw);

    match (column, value) {
        (Column::Name, _) => {}
        (Column::Uf, FieldValue::Text(text)) => record.uf = text,
        (Column::Population, FieldValue::Count(count)) => record.population = Some(count),
        (Column::Code, FieldValue::Number(n)) => {
            record.code = n.filter(|v| *v >= 0.0).map(|v| v as u64)
        }
        (column, FieldValue::Number(n)) => {
            let slot = match column {
                Column::Vegetation => &mut record.quality.vegetation,
                Column::AreaRating => &mut record.quality.area,
                Column::Relief => &mut record.quality.relief,
                Column::Insalubrity => &mut record.quality.insalubrity,
                Column::QuarterQuality(q @ 1..=4) => &mut record.quality.per_quarter[q as usize - 1],
                Column::QuarterTotal(q @ 1..=4) => &mut record.quality.total_per_quarter[q as usize - 1],
                Column::AverageRating => &mut record.quality.average,
                Column::CityArea => &mut record.land.city_area,
                Column::GeoreferencedArea => &mut record.land.georeferenced_area,
                Column::GeoreferencedPercent => &mut record.land.georeferenced_percent,
                Column::PropertyCount => &mut record.land.property_count,
                Column::CarAreaTotal => &mut record.land.car_area_total,
                Column::CarAreaMean => &mut record.land.car_area_mean,
                Column::CarPerimeterTotal => &mut record.land.car_perimeter_total,
                Column::CarPerimeterMean => &mut record.land.car_perimeter_mean,
                Column::MaxPerimeterArea => &mut record.land.max_perimeter_area,
                Column::ValuationByPerimeter => &mut record.valuation_by_perimeter,
                Column::ValuationByArea => &mut record.valuation_by_area,
                Column::MeanValue => &mut record.mean_value,
                Column::MeanCarValue => &mut record.mean_car_value,
                Column::MeanCarPerimeterValue => &mut record.mean_car_perimeter_value,
                _ => return,
            };
            *slot = n;
        }
        (column, _) => {
            tracing::warn!(column = column.canonical_name(), "Unexpected value kind for column");
        }
    }
}
