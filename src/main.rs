use anyhow::Context;
use cache::{JsonFileStore, SnapshotStore};
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use configuration::{Config, OutputFormat};
use core_types::DateRangeQuery;
use dashboard::DashboardEngine;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

mod render;

/// The main entry point for the Tickerscope market dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; FMP_API_KEY may come from the shell instead.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args, &config).await,
        Commands::Cache { action } => handle_cache(action, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Daily market calendar, period rollups and trading statistics for a stock.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = configuration::CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch (or load from cache) and print the dashboard for one symbol.
    Report(ReportArgs),
    /// Inspect or empty the local snapshot cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args)]
struct ReportArgs {
    /// The ticker symbol (e.g., "AAPL"). Defaults to `defaults.symbol`.
    #[arg(long)]
    symbol: Option<String>,

    /// The first day of the range (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// The last day of the range (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Output as tables or as the full dashboard in JSON.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Ignore any cached snapshot and fetch again.
    #[arg(long)]
    refresh: bool,
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached snapshots with their age and completeness.
    Stats,
    /// Remove every cached snapshot.
    Clear,
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

/// Resolves the query from flags and defaults, loads the dashboard and prints it.
async fn handle_report(args: ReportArgs, config: &Config) -> anyhow::Result<()> {
    let symbol = args.symbol.as_deref().unwrap_or(&config.defaults.symbol);
    let to = args.to.unwrap_or_else(|| Local::now().date_naive());
    let query = match args.from {
        Some(from) => DateRangeQuery::new(symbol, from, to)?,
        None => DateRangeQuery::trailing(symbol, to, config.defaults.lookback_days)?,
    };
    let format = args.format.unwrap_or(config.defaults.format);

    let engine = DashboardEngine::from_config(config).map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Loading {query}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = engine.load(&query, args.refresh).await;
    spinner.finish_and_clear();

    let dashboard = result.map_err(|e| {
        tracing::error!(error = %e, %query, "Dashboard load failed.");
        anyhow::anyhow!(e.user_message())
    })?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dashboard)?),
        OutputFormat::Table => render::print_dashboard(&dashboard, Utc::now()),
    }

    Ok(())
}

// ==============================================================================
// Cache Command Logic
// ==============================================================================

fn handle_cache(action: CacheAction, config: &Config) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.cache.path);

    match action {
        CacheAction::Stats => {
            let snapshots = store.list().context("Failed to read the cache")?;
            if snapshots.is_empty() {
                println!("No cached data in {}.", store.path().display());
                return Ok(());
            }
            let now = Utc::now();
            let stats = snapshots
                .iter()
                .map(|snapshot| snapshot.stats(now))
                .collect::<Result<Vec<_>, _>>()?;
            println!("{}", render::cache_stats_table(&stats));
        }
        CacheAction::Clear => {
            store.clear().context("Failed to clear the cache")?;
            println!("Cleared all cached data from {}.", store.path().display());
        }
    }

    Ok(())
}
