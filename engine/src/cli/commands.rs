use engine::query::{FilterSet, Query, Range, SortSpec};
use engine::services::{DashboardService, RecommendRequest};
use serde::Serialize;
use shared::brazilian_format::{clean_number, convert_brazilian_number, fix_population};
use shared::models::Strategy;

use super::output::{json, table};
use super::{OutputFormat, QueryArgs};

pub fn overview(service: &mut DashboardService, output: OutputFormat) -> anyhow::Result<()> {
    let overview = service.overview()?;
    match output {
        OutputFormat::Json => json::print(&overview),
        OutputFormat::Table => {
            table::print_overview(&overview);
            Ok(())
        }
    }
}

pub fn recommend(
    service: &mut DashboardService,
    budget: Option<f64>,
    population: Option<u64>,
    strategy: Strategy,
    top: Option<usize>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let mut request = RecommendRequest::new(strategy);
    request.budget = budget;
    request.target_population = population;
    request.top_n = top;

    let recommendations = service.recommend(&request)?;
    match output {
        OutputFormat::Json => json::print(&recommendations),
        OutputFormat::Table => {
            table::print_recommendations(&recommendations, strategy);
            Ok(())
        }
    }
}

// A bound given on one side only leaves the other side open.
fn range(min: Option<f64>, max: Option<f64>) -> Option<Range> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(Range::new(
        min.unwrap_or(f64::NEG_INFINITY),
        max.unwrap_or(f64::INFINITY),
    ))
}

pub fn query(service: &mut DashboardService, args: QueryArgs) -> anyhow::Result<()> {
    let mut query = Query::new(args.columns);
    query.filters = FilterSet {
        names: args.names,
        search: args.search,
        population: range(args.min_population, args.max_population),
        rating: range(args.min_rating, args.max_rating),
        valuation: range(args.min_valuation, args.max_valuation),
        georeferenced_area: range(args.min_georef_area, args.max_georef_area),
    };
    query.group_by = args.group_by;
    query.sort = args.sort.map(|column| SortSpec {
        column,
        descending: args.desc,
    });
    query.limit = args.limit;

    let result = service.run_query(&query)?;
    match args.output {
        OutputFormat::Json => json::print(&result),
        OutputFormat::Table => {
            table::print_query_result(&result);
            Ok(())
        }
    }
}

pub fn search(service: &mut DashboardService, term: &str, output: OutputFormat) -> anyhow::Result<()> {
    let names = service.search(term)?;
    match output {
        OutputFormat::Json => json::print(&names),
        OutputFormat::Table => {
            if names.is_empty() {
                println!("No municipality matches '{term}'");
            }
            for name in &names {
                println!("{name}");
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
pub struct NormalizedValue {
    pub input: String,
    /// `None` when the general routine could not read the text.
    pub general: Option<f64>,
    pub strict: f64,
    pub population: u64,
}

pub fn normalize(values: &[String], output: OutputFormat) -> anyhow::Result<()> {
    let normalized: Vec<NormalizedValue> = values
        .iter()
        .map(|input| {
            let general = clean_number(input);
            NormalizedValue {
                input: input.clone(),
                general: (!general.is_nan()).then_some(general),
                strict: convert_brazilian_number(input),
                population: fix_population(input),
            }
        })
        .collect();

    match output {
        OutputFormat::Json => json::print(&normalized),
        OutputFormat::Table => {
            table::print_normalized(&normalized);
            Ok(())
        }
    }
}

pub fn analytics(service: &DashboardService, output: OutputFormat) -> anyhow::Result<()> {
    let summary = service.analytics_summary();
    match output {
        OutputFormat::Json => json::print(&summary),
        OutputFormat::Table => {
            match &summary {
                Some(summary) => table::print_analytics(summary),
                None => println!("No analytics available"),
            }
            Ok(())
        }
    }
}
