use engine::analytics::AnalyticsSummary;
use engine::data::Overview;
use engine::query::{CellValue, QueryResult};
use engine::scoring::ScoredRecord;
use shared::brazilian_format::{format_compact, format_decimal, format_integer};
use shared::models::Strategy;

use crate::cli::commands::NormalizedValue;

const NOT_AVAILABLE: &str = "N/A";

// Left-aligned columns sized to the widest cell, in characters.
fn render(headers: &[String], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", line(headers));
    println!(
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    );
    for row in rows {
        println!("{}", line(row.as_slice()));
    }
}

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(text) => text.clone(),
        CellValue::Integer(Some(v)) => format_integer(*v as f64),
        CellValue::Number(Some(v)) => format_decimal(*v, 2),
        CellValue::Integer(None) | CellValue::Number(None) => NOT_AVAILABLE.to_string(),
    }
}

pub fn print_overview(overview: &Overview) {
    println!("Municípios:                 {}", overview.municipality_count);
    println!(
        "Nota média:                 {}",
        overview
            .mean_rating
            .map_or_else(|| NOT_AVAILABLE.to_string(), |r| format_decimal(r, 2))
    );
    println!(
        "Valor total (área):         {}",
        format_compact(overview.total_valuation_by_area, true)
    );
    println!(
        "Valor total (perímetro):    {}",
        format_compact(overview.total_valuation_by_perimeter, true)
    );
}

pub fn print_recommendations(recommendations: &[ScoredRecord], strategy: Strategy) {
    println!("=== Recomendações ({}) ===\n", strategy);
    if recommendations.is_empty() {
        println!("  No municipalities to recommend");
        return;
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!("  {}. {}  (score: {})", rank + 1, rec.name, format_decimal(rec.score, 1));
        for explanation in &rec.explanations {
            println!("       - {}", explanation);
        }
    }
}

pub fn print_query_result(result: &QueryResult) {
    if result.is_empty() {
        println!("No rows match the query");
        return;
    }
    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    render(&result.headers, &rows);
    println!("\n{} row(s)", result.len());
}

pub fn print_normalized(values: &[NormalizedValue]) {
    let headers: Vec<String> = ["Input", "clean_number", "convert_brazilian_number", "fix_population"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows: Vec<Vec<String>> = values
        .iter()
        .map(|v| {
            vec![
                v.input.clone(),
                v.general.map_or_else(|| "NaN".to_string(), |g| g.to_string()),
                v.strict.to_string(),
                v.population.to_string(),
            ]
        })
        .collect();
    render(&headers, &rows);
}

pub fn print_analytics(summary: &AnalyticsSummary) {
    println!("Interações:       {}", summary.total_interactions);
    println!("Sessões únicas:   {}", summary.unique_sessions);

    if !summary.top_actions.is_empty() {
        println!("\nAções mais frequentes:");
        for action in &summary.top_actions {
            println!("  {:<28} {}", action.action, action.count);
        }
    }
    if !summary.daily_usage.is_empty() {
        println!("\nUso diário:");
        for (day, count) in &summary.daily_usage {
            println!("  {}  {}", day.format("%d/%m/%Y"), count);
        }
    }
}
