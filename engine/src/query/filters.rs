// Record filters shared by the sidebar and the query builder.
use serde::{Deserialize, Serialize};
use shared::models::MunicipalityRecord;
use shared::utils::matches_search;

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Every set filter must match. Missing values count as 0 in range checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Exact municipality names; empty means all.
    #[serde(default)]
    pub names: Vec<String>,
    /// Accent- and case-insensitive substring of the name.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub population: Option<Range>,
    #[serde(default)]
    pub rating: Option<Range>,
    #[serde(default)]
    pub valuation: Option<Range>,
    #[serde(default)]
    pub georeferenced_area: Option<Range>,
}

fn within(range: &Option<Range>, value: f64) -> bool {
    range.map_or(true, |r| r.contains(value))
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        *self == FilterSet::default()
    }

    pub fn matches(&self, record: &MunicipalityRecord) -> bool {
        if !self.names.is_empty() && !self.names.iter().any(|n| *n == record.name) {
            return false;
        }
        if let Some(term) = &self.search {
            if !matches_search(&record.name, term) {
                return false;
            }
        }
        within(&self.population, record.population_or_zero())
            && within(&self.rating, record.average_rating_or_zero())
            && within(&self.valuation, record.valuation_by_area_or_zero())
            && within(
                &self.georeferenced_area,
                record.land.georeferenced_area.unwrap_or(0.0),
            )
    }

    pub fn apply<'a>(&self, records: &'a [MunicipalityRecord]) -> Vec<&'a MunicipalityRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<MunicipalityRecord> {
        let mut maceio = MunicipalityRecord::new("Maceió");
        maceio.population = Some(953_326);
        maceio.quality.average = Some(20.0);
        maceio.valuation_by_area = Some(20_000_000_000.0);

        let mut belem = MunicipalityRecord::new("Belém");
        belem.population = Some(4_500);
        belem.quality.average = Some(12.5);
        belem.land.georeferenced_area = Some(1_000.0);

        vec![maceio, belem, MunicipalityRecord::new("Pilar")]
    }

    fn names(filtered: Vec<&MunicipalityRecord>) -> Vec<&str> {
        filtered.into_iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let data = records();
        assert!(FilterSet::default().is_empty());
        assert_eq!(FilterSet::default().apply(&data).len(), 3);
    }

    #[test]
    fn test_name_and_search_filters() {
        let data = records();
        let by_name = FilterSet {
            names: vec!["Pilar".to_string(), "Belém".to_string()],
            ..Default::default()
        };
        assert_eq!(names(by_name.apply(&data)), vec!["Belém", "Pilar"]);

        let search = FilterSet {
            search: Some("belem".to_string()),
            ..Default::default()
        };
        assert_eq!(names(search.apply(&data)), vec!["Belém"]);
    }

    #[test]
    fn test_range_filters_treat_missing_as_zero() {
        let data = records();
        let population = FilterSet {
            population: Some(Range::new(0.0, 10_000.0)),
            ..Default::default()
        };
        assert_eq!(names(population.apply(&data)), vec!["Belém", "Pilar"]);

        let rating = FilterSet {
            rating: Some(Range::new(12.5, 25.0)),
            ..Default::default()
        };
        assert_eq!(names(rating.apply(&data)), vec!["Maceió", "Belém"]);

        let valuation_and_georef = FilterSet {
            valuation: Some(Range::new(0.0, 1.0)),
            georeferenced_area: Some(Range::new(500.0, 2_000.0)),
            ..Default::default()
        };
        assert_eq!(names(valuation_and_georef.apply(&data)), vec!["Belém"]);
    }
}
