// Grouping of filtered records into bands, letters or quartiles, with
// per-column count/mean(/sum) aggregates.
use serde::{Deserialize, Serialize};
use shared::models::MunicipalityRecord;
use std::collections::BTreeMap;
use std::str::FromStr;

use super::{CellValue, QueryColumn, QueryResult};
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    #[default]
    None,
    PopulationBand,
    RatingBand,
    ValuationBand,
    Alphabetical,
    Quartiles,
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "none" => Ok(GroupBy::None),
            "population" | "populationband" => Ok(GroupBy::PopulationBand),
            "rating" | "ratingband" => Ok(GroupBy::RatingBand),
            "valuation" | "valuationband" => Ok(GroupBy::ValuationBand),
            "alphabetical" | "letter" => Ok(GroupBy::Alphabetical),
            "quartiles" => Ok(GroupBy::Quartiles),
            _ => Err(format!(
                "Unknown grouping '{}'. Use none, population, rating, valuation, alphabetical or quartiles.",
                s
            )),
        }
    }
}

/// Half-open interval `(lo, hi]`.
struct Band {
    label: &'static str,
    lo: f64,
    hi: f64,
}

const POPULATION_BANDS: [Band; 4] = [
    Band { label: "Pequeno (até 20k)", lo: 0.0, hi: 20_000.0 },
    Band { label: "Médio (20k-50k)", lo: 20_000.0, hi: 50_000.0 },
    Band { label: "Grande (50k-100k)", lo: 50_000.0, hi: 100_000.0 },
    Band { label: "Muito Grande (100k+)", lo: 100_000.0, hi: f64::INFINITY },
];

const RATING_BANDS: [Band; 5] = [
    Band { label: "Muito Baixa (0-2)", lo: 0.0, hi: 2.0 },
    Band { label: "Baixa (2-4)", lo: 2.0, hi: 4.0 },
    Band { label: "Média (4-6)", lo: 4.0, hi: 6.0 },
    Band { label: "Alta (6-8)", lo: 6.0, hi: 8.0 },
    Band { label: "Muito Alta (8-10)", lo: 8.0, hi: 10.0 },
];

// In billions.
const VALUATION_BANDS: [Band; 4] = [
    Band { label: "Baixo (até 5B)", lo: 0.0, hi: 5.0 },
    Band { label: "Médio (5B-15B)", lo: 5.0, hi: 15.0 },
    Band { label: "Alto (15B-25B)", lo: 15.0, hi: 25.0 },
    Band { label: "Premium (25B+)", lo: 25.0, hi: f64::INFINITY },
];

const QUARTILE_LABELS: [&str; 4] = ["Q1 (25% menores)", "Q2", "Q3", "Q4 (25% maiores)"];

fn band_of(bands: &[Band], value: f64) -> Option<usize> {
    bands.iter().position(|b| value > b.lo && value <= b.hi)
}

// Linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn quartile_edges(values: &[f64]) -> EngineResult<[f64; 5]> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let edges = [0.0, 0.25, 0.5, 0.75, 1.0].map(|q| quantile(&sorted, q));
    if edges.windows(2).any(|w| w[0] == w[1]) {
        return Err(EngineError::QueryError(format!(
            "Quartile edges are not unique: {:?}",
            edges
        )));
    }
    Ok(edges)
}

fn quartile_of(edges: &[f64; 5], value: f64) -> usize {
    (1..4).find(|&i| value <= edges[i]).map_or(3, |i| i - 1)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Clone, Copy)]
struct Aggregations {
    sum: bool,
}

// Assigns each record to an ordered group key; `None` drops the record.
type Keyed<'a> = Vec<(Option<(usize, String)>, &'a MunicipalityRecord)>;

fn assign<'a>(
    records: &[&'a MunicipalityRecord],
    key: impl Fn(&MunicipalityRecord) -> Option<(usize, String)>,
) -> Keyed<'a> {
    records.iter().map(|r| (key(r), *r)).collect()
}

/// Groups records. Returns `None` when the grouping does not apply and the
/// caller should fall back to a plain selection.
pub fn group(
    records: &[&MunicipalityRecord],
    group_by: GroupBy,
    columns: &[QueryColumn],
) -> EngineResult<Option<QueryResult>> {
    let numeric: Vec<QueryColumn> = columns.iter().copied().filter(|c| c.is_numeric()).collect();

    let (header, keyed, aggregations) = match group_by {
        GroupBy::None => return Ok(None),
        GroupBy::PopulationBand => (
            "Faixa_Populacao",
            assign(records, |r| {
                band_of(&POPULATION_BANDS, r.population_or_zero())
                    .map(|i| (i, POPULATION_BANDS[i].label.to_string()))
            }),
            Aggregations { sum: true },
        ),
        GroupBy::RatingBand => (
            "Faixa_Nota",
            assign(records, |r| {
                band_of(&RATING_BANDS, r.average_rating_or_zero())
                    .map(|i| (i, RATING_BANDS[i].label.to_string()))
            }),
            Aggregations { sum: false },
        ),
        GroupBy::ValuationBand => (
            "Faixa_Valor",
            assign(records, |r| {
                band_of(&VALUATION_BANDS, r.valuation_by_area_or_zero() / 1_000_000_000.0)
                    .map(|i| (i, VALUATION_BANDS[i].label.to_string()))
            }),
            Aggregations { sum: true },
        ),
        GroupBy::Alphabetical => (
            "Primeira_Letra",
            assign(records, |r| {
                r.name.chars().next().map(|c| {
                    let letter: String = c.to_uppercase().collect();
                    // Letters order by their code point.
                    (c.to_uppercase().next().map_or(0, |u| u as usize), letter)
                })
            }),
            Aggregations { sum: false },
        ),
        GroupBy::Quartiles => {
            let Some(basis) = numeric.first().copied().filter(|_| columns.len() > 1) else {
                return Ok(None);
            };
            let values: Vec<f64> = records.iter().map(|r| basis.value(r).as_f64()).collect();
            if values.is_empty() {
                return Ok(Some(empty_result("Quartil", &numeric, false)));
            }
            let edges = quartile_edges(&values)?;
            (
                "Quartil",
                assign(records, |r| {
                    let q = quartile_of(&edges, basis.value(r).as_f64());
                    Some((q, QUARTILE_LABELS[q].to_string()))
                }),
                Aggregations { sum: false },
            )
        }
    };

    let mut groups: BTreeMap<(usize, String), Vec<&MunicipalityRecord>> = BTreeMap::new();
    for (key, record) in keyed {
        if let Some(key) = key {
            groups.entry(key).or_default().push(record);
        }
    }

    let mut result = empty_result(header, &numeric, aggregations.sum);
    for ((_, label), members) in groups {
        let mut row = vec![CellValue::Text(label)];
        if numeric.is_empty() {
            row.push(CellValue::Integer(Some(members.len() as u64)));
        }
        for column in &numeric {
            let present: Vec<f64> = members
                .iter()
                .filter_map(|r| match column.value(r) {
                    CellValue::Integer(v) => v.map(|v| v as f64),
                    CellValue::Number(v) => v,
                    CellValue::Text(_) => None,
                })
                .collect();
            let sum: f64 = present.iter().sum();
            let mean = (!present.is_empty()).then(|| round2(sum / present.len() as f64));
            row.push(CellValue::Integer(Some(present.len() as u64)));
            row.push(CellValue::Number(mean));
            if aggregations.sum {
                row.push(CellValue::Number(Some(round2(sum))));
            }
        }
        result.rows.push(row);
    }

    tracing::debug!(grouping = ?group_by, groups = result.rows.len(), "Grouped query result");
    Ok(Some(result))
}

fn empty_result(header: &str, numeric: &[QueryColumn], with_sum: bool) -> QueryResult {
    let mut headers = vec![header.to_string()];
    if numeric.is_empty() {
        headers.push("Quantidade".to_string());
    }
    for column in numeric {
        headers.push(format!("{}_count", column.header()));
        headers.push(format!("{}_mean", column.header()));
        if with_sum {
            headers.push(format!("{}_sum", column.header()));
        }
    }
    QueryResult {
        headers,
        rows: Vec::new(),
    }
}
