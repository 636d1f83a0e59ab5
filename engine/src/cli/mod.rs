mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use engine::config::EngineSettings;
use engine::query::{GroupBy, QueryColumn};
use engine::services::DashboardService;
use shared::models::Strategy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "precificacao",
    version,
    about = "Pricing analytics and recommendations for the municipalities of Alagoas"
)]
pub struct Cli {
    /// Settings file (defaults to the embedded configuration)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dataset CSV (defaults to searching the configured directories)
    #[arg(long, global = true, value_name = "FILE")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline metrics for the whole dataset
    Overview {
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Rank municipalities against a budget, a population target and a strategy
    Recommend {
        /// Budget ceiling in R$, Brazilian format accepted (e.g. "1.000.000,00")
        #[arg(short, long, value_parser = parse_amount)]
        budget: Option<f64>,

        /// Target population
        #[arg(short, long)]
        population: Option<u64>,

        /// economic, quality or growth (Portuguese names accepted)
        #[arg(short, long, default_value = "quality")]
        strategy: Strategy,

        /// Number of recommendations
        #[arg(short = 'n', long)]
        top: Option<usize>,

        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Select, filter, group and sort dataset columns
    Query(QueryArgs),
    /// Find municipalities by name, ignoring accents and case
    Search {
        term: String,

        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Show how Brazilian-formatted values are converted
    Normalize {
        #[arg(required = true)]
        values: Vec<String>,

        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Usage summary from the interaction log
    Analytics {
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

#[derive(clap::Args)]
pub struct QueryArgs {
    /// Comma-separated columns, e.g. Municipio,Populacao,Nota_Media
    #[arg(short, long, value_delimiter = ',', default_value = "Municipio,Populacao,Nota_Media")]
    pub columns: Vec<QueryColumn>,

    /// none, population, rating, valuation, alphabetical or quartiles
    #[arg(short, long, default_value = "none")]
    pub group_by: GroupBy,

    /// Column to sort by (ungrouped results only)
    #[arg(long)]
    pub sort: Option<QueryColumn>,

    #[arg(long)]
    pub desc: bool,

    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Keep only these municipalities (repeatable)
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Name substring, ignoring accents and case
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub min_population: Option<f64>,
    #[arg(long)]
    pub max_population: Option<f64>,
    #[arg(long)]
    pub min_rating: Option<f64>,
    #[arg(long)]
    pub max_rating: Option<f64>,
    #[arg(long, value_parser = parse_amount)]
    pub min_valuation: Option<f64>,
    #[arg(long, value_parser = parse_amount)]
    pub max_valuation: Option<f64>,
    #[arg(long)]
    pub min_georef_area: Option<f64>,
    #[arg(long)]
    pub max_georef_area: Option<f64>,

    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

// Amounts are money: every dot groups thousands, as in the dataset's value columns.
fn parse_amount(s: &str) -> Result<f64, String> {
    shared::brazilian_format::parse_strict(s).map_err(|e| e.to_string())
}

fn load_settings(config: Option<&PathBuf>) -> anyhow::Result<EngineSettings> {
    let settings = match config {
        Some(path) => EngineSettings::load_from_file(path)?,
        None => EngineSettings::load_default()?,
    };
    Ok(settings)
}

fn open_service(settings: EngineSettings, data: Option<PathBuf>) -> anyhow::Result<DashboardService> {
    let service = match data {
        Some(path) => DashboardService::with_dataset_path(settings, path),
        None => DashboardService::new(settings)?,
    };
    Ok(service)
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    // Normalization needs neither settings nor data.
    if let Commands::Normalize { values, output } = &cli.command {
        return commands::normalize(values, *output);
    }

    let settings = load_settings(cli.config.as_ref())?;
    let mut service = open_service(settings, cli.data)?;

    match cli.command {
        Commands::Overview { output } => commands::overview(&mut service, output),
        Commands::Recommend {
            budget,
            population,
            strategy,
            top,
            output,
        } => commands::recommend(&mut service, budget, population, strategy, top, output),
        Commands::Query(args) => commands::query(&mut service, args),
        Commands::Search { term, output } => commands::search(&mut service, &term, output),
        Commands::Analytics { output } => commands::analytics(&service, output),
        Commands::Normalize { values, output } => commands::normalize(&values, output),
    }
}
