//! Command line entry point for the FGC rating engine
//!
//! Loads a JSON dataset into an in-memory record store, runs one operation
//! against it and prints the outcome as JSON. With `--output` the (possibly
//! recomputed) dataset is written back out.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fgc_ratings::config::AppConfig;
use fgc_ratings::storage::{Dataset, InMemoryStore};
use fgc_ratings::RatingService;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// FGC Ratings - Elo replay and placement standings
#[derive(Parser)]
#[command(
    name = "fgc-ratings",
    version,
    about = "Recompute fighting-game Elo ratings and placement standings",
    long_about = "Replays the full match history of a game to rebuild every player's Elo rating, \
                 writes rating snapshots onto matches and tournament results, and ranks players \
                 by placement points across tournaments."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Dataset to operate on
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to the JSON dataset (players, games, tournaments, matches, results)"
    )]
    data: PathBuf,

    /// Where to write the dataset after the command ran
    #[arg(long, value_name = "FILE", help = "Write the resulting dataset as JSON")]
    output: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild all ratings of a game from its match history
    Recompute {
        #[arg(long, value_name = "ID")]
        game: String,
    },
    /// List rated players of a game, highest rating first
    Leaderboard {
        #[arg(long, value_name = "ID")]
        game: String,
        /// Players need strictly more matches than this
        #[arg(long, value_name = "N")]
        min_matches: Option<u32>,
        #[arg(long, value_name = "N")]
        limit: Option<String>,
    },
    /// Rank players by placement points
    Standings {
        #[arg(long, value_name = "ID", conflicts_with_all = ["series", "tournament"])]
        game: Option<String>,
        #[arg(long, value_name = "ID", conflicts_with = "tournament")]
        series: Option<String>,
        #[arg(long, value_name = "ID")]
        tournament: Vec<String>,
        #[arg(long, value_name = "N")]
        limit: Option<String>,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file/environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    if let Some(log_level) = &args.log_level {
        config.override_log_level(log_level)?;
    }

    if args.debug {
        config.override_log_level("debug")?;
    }

    Ok(config)
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse dataset {}", path.display()))
}

fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    let raw = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, raw)
        .with_context(|| format!("Failed to write dataset {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(args: Args, config: AppConfig) -> Result<()> {
    let store = Arc::new(InMemoryStore::from_dataset(load_dataset(&args.data)?));
    let service = RatingService::new(store.clone(), config)?;

    match &args.command {
        Command::Recompute { game } => {
            let summary = service.recompute_ratings(game).await?;
            print_json(&summary)?;
        }
        Command::Leaderboard {
            game,
            min_matches,
            limit,
        } => {
            let entries = service
                .leaderboard(game, *min_matches, limit.as_deref())
                .await?;
            print_json(&entries)?;
        }
        Command::Standings {
            game,
            series,
            tournament,
            limit,
        } => {
            let limit = limit.as_deref();
            let standings = match (game, series) {
                (Some(game), _) => service.standings_for_game(game, limit).await?,
                (None, Some(series)) => service.standings_for_series(series, limit).await?,
                (None, None) if !tournament.is_empty() => {
                    let ids: Vec<&str> = tournament.iter().map(String::as_str).collect();
                    service.standings_for_tournaments(&ids, limit).await?
                }
                (None, None) => {
                    anyhow::bail!("One of --game, --series or --tournament is required")
                }
            };
            print_json(&standings)?;
        }
    }

    if let Some(output) = &args.output {
        write_dataset(output, &store.dataset()?)?;
        info!("Dataset written to {}", output.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("{} v{}", config.service.name, fgc_ratings::VERSION);

    if let Err(e) = run(args, config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
