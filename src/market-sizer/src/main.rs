//! Market Sizer CLI: generate a sample dataset, list the available filter
//! options, and estimate the size of a target-customer segment.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use market_core::config::LoggingConfig;
use market_core::{AppConfig, MarketError};
use market_dataset::{CsvDirectory, Dataset, DummyDataGenerator, FilterOptions};
use market_segmentation::{load_and_estimate, RawCriteria};
use tracing::{info, warn};

/// Exit status when the input tables cannot be loaded.
const EXIT_DATA_UNAVAILABLE: u8 = 2;

#[derive(Parser)]
#[command(name = "market-sizer")]
#[command(about = "Estimate the potential customer base for a target homeowner profile")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the five CSV tables (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a randomly generated sample dataset as CSV files
    Generate {
        /// RNG seed for a reproducible dataset
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the criteria values present in the loaded data
    Options {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate the market size for a target profile
    Estimate(EstimateArgs),
}

/// Multi-valued flags take comma-separated labels; leaving a flag out
/// leaves that criterion unconstrained.
#[derive(Args)]
struct EstimateArgs {
    /// Product category: Any, Food, Electronics
    #[arg(long, default_value = "Any")]
    category: String,

    /// Value propositions: cost_savings, convenience, premium_quality
    #[arg(long = "value-prop", value_delimiter = ',')]
    value_props: Vec<String>,

    /// Tones: casual, formal, humorous
    #[arg(long = "tone", value_delimiter = ',')]
    tones: Vec<String>,

    /// Age brackets: 18-24, 25-34, 35-44, 45-54, 55+
    #[arg(long = "age-bracket", value_delimiter = ',')]
    age_brackets: Vec<String>,

    /// Has kids: Any, Yes, No
    #[arg(long, default_value = "Any")]
    has_kids: String,

    /// Family statuses: Single, Married, Divorced, Widowed
    #[arg(long = "family-status", value_delimiter = ',')]
    family_statuses: Vec<String>,

    /// Neighborhoods: Urban, Suburban, Rural
    #[arg(long = "neighborhood", value_delimiter = ',')]
    neighborhoods: Vec<String>,

    /// House ages: "0-10 years", "11-20 years", "21+ years"
    #[arg(long = "house-age", value_delimiter = ',')]
    house_age_brackets: Vec<String>,

    /// Smallest house size in sqft (inclusive)
    #[arg(long)]
    min_sqft: Option<u32>,

    /// Largest house size in sqft (inclusive)
    #[arg(long)]
    max_sqft: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl From<EstimateArgs> for RawCriteria {
    fn from(args: EstimateArgs) -> Self {
        RawCriteria {
            category: Some(args.category),
            value_props: args.value_props,
            tones: args.tones,
            age_brackets: args.age_brackets,
            has_kids: Some(args.has_kids),
            family_statuses: args.family_statuses,
            neighborhoods: args.neighborhoods,
            house_age_brackets: args.house_age_brackets,
            min_sqft: args.min_sqft,
            max_sqft: args.max_sqft,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = AppConfig::load(cli.config.as_deref());
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => AppConfig::default(),
    };
    init_tracing(&config.logging, cli.json_logs || config.logging.json);
    if let Err(e) = loaded {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }

    match cli.command {
        Commands::Generate { seed } => cmd_generate(&config, seed),
        Commands::Options { json } => cmd_options(&config, json),
        Commands::Estimate(args) => {
            let json = args.json;
            cmd_estimate(&config, args.into(), json)
        }
    }
}

fn init_tracing(logging: &LoggingConfig, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn cmd_generate(config: &AppConfig, seed: Option<u64>) -> anyhow::Result<ExitCode> {
    let mut generator = config.generator.clone();
    if seed.is_some() {
        generator.seed = seed;
    }

    let tables = DummyDataGenerator::new(generator)
        .generate()
        .context("Failed to generate sample data")?;
    tables
        .write_csv(&config.data)
        .with_context(|| format!("Failed to write tables to {}", config.data.dir.display()))?;

    println!(
        "Wrote {} owners, {} houses, {} service visits, {} ad ratings and {} advertisements to {}",
        tables.owners.len(),
        tables.houses.len(),
        tables.service_visits.len(),
        tables.ad_ratings.len(),
        tables.advertisements.len(),
        config.data.dir.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_options(config: &AppConfig, json: bool) -> anyhow::Result<ExitCode> {
    let source = CsvDirectory::new(config.data.clone());
    let dataset = match Dataset::load(&source) {
        Ok(dataset) => dataset,
        Err(e) => return unavailable(e),
    };
    let options = dataset.filter_options();

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
    } else {
        print_options(&options);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_options(options: &FilterOptions) {
    println!("Category:        {}", join(&options.categories));
    println!("Value prop:      {}", join(&options.value_props));
    println!("Tone:            {}", join(&options.tones));
    println!("Age bracket:     {}", join(&options.age_brackets));
    println!("Has kids:        Any, Yes, No");
    println!("Family status:   {}", join(&options.family_statuses));
    println!("Neighborhood:    {}", join(&options.neighborhoods));
    println!("House age:       {}", join(&options.house_age_brackets));
    match options.sqft_bounds {
        Some((min, max)) => println!("House size sqft: {min} - {max}"),
        None => println!("House size sqft: (no houses)"),
    }
}

fn join<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_estimate(config: &AppConfig, criteria: RawCriteria, json: bool) -> anyhow::Result<ExitCode> {
    let source = CsvDirectory::new(config.data.clone());
    let report = load_and_estimate(&source, &criteria);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render_text());
    }

    if report.is_data_unavailable() {
        return Ok(ExitCode::from(EXIT_DATA_UNAVAILABLE));
    }
    info!(count = ?report.count, "Estimate complete");
    Ok(ExitCode::SUCCESS)
}

fn unavailable(err: MarketError) -> anyhow::Result<ExitCode> {
    if !err.is_data_unavailable() {
        return Err(err.into());
    }
    eprintln!("Data unavailable: {err}");
    Ok(ExitCode::from(EXIT_DATA_UNAVAILABLE))
}
