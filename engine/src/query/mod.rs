// Ad-hoc query builder: pick columns, filter, group, sort and limit.
pub mod filters;
pub mod grouping;

pub use filters::{FilterSet, Range};
pub use grouping::GroupBy;

use serde::{Deserialize, Serialize};
use shared::models::MunicipalityRecord;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::data::Dataset;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryColumn {
    Name,
    Population,
    ValuationByArea,
    ValuationByPerimeter,
    AverageRating,
    Vegetation,
    AreaRating,
    Relief,
    CityArea,
    PropertyCount,
}

impl QueryColumn {
    pub const ALL: [QueryColumn; 10] = [
        QueryColumn::Name,
        QueryColumn::Population,
        QueryColumn::ValuationByArea,
        QueryColumn::ValuationByPerimeter,
        QueryColumn::AverageRating,
        QueryColumn::Vegetation,
        QueryColumn::AreaRating,
        QueryColumn::Relief,
        QueryColumn::CityArea,
        QueryColumn::PropertyCount,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            QueryColumn::Name => "Municipio",
            QueryColumn::Population => "Populacao",
            QueryColumn::ValuationByArea => "Valor_Municipal_Area",
            QueryColumn::ValuationByPerimeter => "Valor_Municipal_Perimetro",
            QueryColumn::AverageRating => "Nota_Media",
            QueryColumn::Vegetation => "Nota_Vegetacao",
            QueryColumn::AreaRating => "Nota_Area",
            QueryColumn::Relief => "Nota_Relevo",
            QueryColumn::CityArea => "Area_Cidade",
            QueryColumn::PropertyCount => "Num_Imoveis",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, QueryColumn::Name)
    }

    pub fn value(&self, record: &MunicipalityRecord) -> CellValue {
        match self {
            QueryColumn::Name => CellValue::Text(record.name.clone()),
            QueryColumn::Population => CellValue::Integer(record.population),
            QueryColumn::ValuationByArea => CellValue::Number(record.valuation_by_area),
            QueryColumn::ValuationByPerimeter => CellValue::Number(record.valuation_by_perimeter),
            QueryColumn::AverageRating => CellValue::Number(record.quality.average),
            QueryColumn::Vegetation => CellValue::Number(record.quality.vegetation),
            QueryColumn::AreaRating => CellValue::Number(record.quality.area),
            QueryColumn::Relief => CellValue::Number(record.quality.relief),
            QueryColumn::CityArea => CellValue::Number(record.land.city_area),
            QueryColumn::PropertyCount => CellValue::Number(record.land.property_count),
        }
    }
}

impl FromStr for QueryColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryColumn::ALL
            .iter()
            .find(|c| c.header().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                let known: Vec<&str> = QueryColumn::ALL.iter().map(|c| c.header()).collect();
                format!("Unknown column '{}'. Available: {}", s, known.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(Option<u64>),
    Number(Option<f64>),
}

impl CellValue {
    /// Numeric view used for sorting; missing and text values are 0.
    pub fn as_f64(&self) -> f64 {
        match self {
            CellValue::Text(_) => 0.0,
            CellValue::Integer(v) => v.unwrap_or(0) as f64,
            CellValue::Number(v) => v.unwrap_or(0.0),
        }
    }

    fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: QueryColumn,
    pub descending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub columns: Vec<QueryColumn>,
    #[serde(default)]
    pub filters: FilterSet,
    #[serde(default)]
    pub group_by: GroupBy,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(columns: Vec<QueryColumn>) -> Self {
        Self {
            columns,
            filters: FilterSet::default(),
            group_by: GroupBy::None,
            sort: None,
            limit: None,
        }
    }

    pub fn run(&self, dataset: &Dataset) -> EngineResult<QueryResult> {
        if self.columns.is_empty() {
            return Err(EngineError::QueryError(
                "Select at least one column to show".to_string(),
            ));
        }

        let filtered = self.filters.apply(dataset.records());
        let grouped = grouping::group(&filtered, self.group_by, &self.columns)?;

        let mut result = match grouped {
            Some(result) => result,
            None => self.select(&filtered),
        };

        if let Some(limit) = self.limit {
            result.rows.truncate(limit);
        }
        Ok(result)
    }

    // Plain projection, sorted when a sort column among the selected ones is given.
    fn select(&self, records: &[&MunicipalityRecord]) -> QueryResult {
        let mut rows: Vec<Vec<CellValue>> = records
            .iter()
            .map(|r| self.columns.iter().map(|c| c.value(r)).collect())
            .collect();

        if let Some(sort) = self.sort {
            if let Some(idx) = self.columns.iter().position(|c| *c == sort.column) {
                rows.sort_by(|a, b| {
                    let ord = a[idx].compare(&b[idx]);
                    if sort.descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                });
            }
        }

        QueryResult {
            headers: self.columns.iter().map(|c| c.header().to_string()).collect(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let mut a = MunicipalityRecord::new("Arapiraca");
        a.population = Some(234_696);
        a.valuation_by_area = Some(3_000_000_000.0);
        let mut b = MunicipalityRecord::new("Belém");
        b.population = Some(4_500);
        b.valuation_by_area = None;
        let mut c = MunicipalityRecord::new("Coruripe");
        c.population = Some(57_000);
        c.valuation_by_area = Some(7_500_000_000.0);
        Dataset::new(vec![a, b, c])
    }

    #[test]
    fn test_requires_columns() {
        let err = Query::new(vec![]).run(&dataset()).unwrap_err();
        assert!(matches!(err, EngineError::QueryError(_)));
    }

    #[test]
    fn test_plain_selection_keeps_order() {
        let result = Query::new(vec![QueryColumn::Name, QueryColumn::Population])
            .run(&dataset())
            .unwrap();
        assert_eq!(result.headers, vec!["Municipio", "Populacao"]);
        assert_eq!(result.rows[0][0], CellValue::Text("Arapiraca".to_string()));
        assert_eq!(result.rows[1][1], CellValue::Integer(Some(4_500)));
    }

    #[test]
    fn test_sort_descending_with_missing_as_zero() {
        let mut query = Query::new(vec![QueryColumn::Name, QueryColumn::ValuationByArea]);
        query.sort = Some(SortSpec {
            column: QueryColumn::ValuationByArea,
            descending: true,
        });
        let result = query.run(&dataset()).unwrap();
        let names: Vec<&CellValue> = result.rows.iter().map(|r| &r[0]).collect();
        assert_eq!(
            names,
            vec![
                &CellValue::Text("Coruripe".to_string()),
                &CellValue::Text("Arapiraca".to_string()),
                &CellValue::Text("Belém".to_string()),
            ]
        );
    }

    #[test]
    fn test_sort_by_unselected_column_is_ignored() {
        let mut query = Query::new(vec![QueryColumn::Name]);
        query.sort = Some(SortSpec {
            column: QueryColumn::Population,
            descending: true,
        });
        let result = query.run(&dataset()).unwrap();
        assert_eq!(result.rows[0][0], CellValue::Text("Arapiraca".to_string()));
    }

    #[test]
    fn test_filters_and_limit() {
        let mut query = Query::new(vec![QueryColumn::Name]);
        query.filters.population = Some(Range::new(10_000.0, 1_000_000.0));
        query.limit = Some(1);
        let result = query.run(&dataset()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0][0], CellValue::Text("Arapiraca".to_string()));
    }

    #[test]
    fn test_column_from_str() {
        assert_eq!("populacao".parse::<QueryColumn>().unwrap(), QueryColumn::Population);
        assert_eq!("Nota_Media".parse::<QueryColumn>().unwrap(), QueryColumn::AverageRating);
        assert!("Valor".parse::<QueryColumn>().is_err());
    }
}
