//! shelf-engine - reading-history analytics
//!
//! Pipeline stages are exposed as subcommands that read and write JSON, plus
//! combined `run`/`run-compare` commands and a read-only API server.
//! Structured output goes to stdout; logs go to stderr.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shelf_common::config::TomlConfig;
use shelf_common::ReaderShelf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use shelf_engine::db::{self, comparisons, profiles};
use shelf_engine::export;
use shelf_engine::payload::{ComparisonPayload, ProfilePayload};
use shelf_engine::pipeline;
use shelf_engine::{build_router, compare, compute_stats, AppState, IngestError, ShelfFetcher};

#[derive(Debug, Parser)]
#[command(name = "shelf-engine", version, about = "Reading-history analytics and comparisons")]
struct Cli {
    /// Config file (overrides SHELF_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides config and SHELF_DATABASE)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Log level or filter directive (overrides config and RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and normalize a reader's shelf, printing it as JSON
    Fetch {
        /// Numeric reader id or profile URL
        reader: String,
    },
    /// Compute analytics for a shelf JSON, printing a profile payload
    Stats {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Heatmap reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Compare two shelf JSON files, printing a comparison payload
    Compare { shelf_a: PathBuf, shelf_b: PathBuf },
    /// Print a shelf as a tab-separated table
    Export {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Only books with review text
        #[arg(long)]
        reviews: bool,
    },
    /// Store a profile (or comparison) payload
    Store {
        #[arg(long)]
        comparison: bool,
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Fetch, analyze and store one reader
    Run {
        reader: String,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Fetch, analyze, compare and store two readers
    RunCompare {
        reader_a: String,
        reader_b: String,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Serve stored results over HTTP
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

/// `--log-level`, else RUST_LOG, else `info` until the config file is read
fn init_tracing(cli_level: Option<&str>) -> reload::Handle<EnvFilter, Registry> {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    handle
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_handle = init_tracing(cli.log_level.as_deref());
    info!("Starting shelf-engine v{}", env!("CARGO_PKG_VERSION"));

    let config =
        TomlConfig::resolve(cli.config.as_deref()).context("Failed to load configuration")?;

    // Config level applies only when neither the flag nor RUST_LOG chose one
    if cli.log_level.is_none() && std::env::var_os("RUST_LOG").is_none() {
        log_handle
            .reload(EnvFilter::new(&config.logging.level))
            .context("Failed to apply configured log level")?;
    }

    let db_path = config.database_path(cli.database.as_deref());

    match cli.command {
        Command::Fetch { reader } => {
            let fetcher = ShelfFetcher::from_config(&config)?;
            let shelf = fetcher.fetch_shelf(&reader).await.map_err(explain)?;
            print_json(&shelf)?;
        }
        Command::Stats { input, as_of } => {
            let shelf: ReaderShelf = read_json(input.as_deref())?;
            let stats = compute_stats(&shelf, resolve_as_of(as_of));
            print_json(&ProfilePayload::new(shelf, stats))?;
        }
        Command::Compare { shelf_a, shelf_b } => {
            let a: ReaderShelf = read_json(Some(shelf_a.as_path()))?;
            let b: ReaderShelf = read_json(Some(shelf_b.as_path()))?;
            let result = compare(&a, &b);
            print_json(&ComparisonPayload::new(&a, &b, result))?;
        }
        Command::Export { input, reviews } => {
            let shelf: ReaderShelf = read_json(input.as_deref())?;
            let table = if reviews {
                export::reviews_table(&shelf.books)
            } else {
                export::books_table(&shelf.books)
            };
            std::io::stdout().lock().write_all(table.as_bytes())?;
        }
        Command::Store { comparison, input } => {
            let pool = db::init_database_pool(&db_path).await?;
            if comparison {
                let payload: ComparisonPayload = read_json(input.as_deref())?;
                comparisons::upsert_comparison(&pool, &payload).await?;
            } else {
                let payload: ProfilePayload = read_json(input.as_deref())?;
                profiles::upsert_profile(&pool, &payload).await?;
            }
        }
        Command::Run { reader, as_of } => {
            let fetcher = ShelfFetcher::from_config(&config)?;
            let payload = pipeline::run_profile(&fetcher, &reader, resolve_as_of(as_of))
                .await
                .map_err(explain)?;

            let pool = db::init_database_pool(&db_path).await?;
            profiles::upsert_profile(&pool, &payload).await?;
            print_json(&payload)?;
        }
        Command::RunCompare {
            reader_a,
            reader_b,
            as_of,
        } => {
            let fetcher = ShelfFetcher::from_config(&config)?;
            let run = pipeline::run_comparison(&fetcher, &reader_a, &reader_b, resolve_as_of(as_of))
                .await
                .map_err(explain)?;

            let pool = db::init_database_pool(&db_path).await?;
            comparisons::store_comparison_bundle(
                &pool,
                &run.profile_a,
                &run.profile_b,
                &run.comparison,
            )
            .await?;
            print_json(&run.comparison)?;
        }
        Command::Serve { port } => {
            let pool = db::init_database_pool(&db_path).await?;
            info!("Database path: {}", db_path.display());

            let app = build_router(AppState::new(pool));
            let addr = format!("127.0.0.1:{}", port.unwrap_or(config.port));
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            info!("shelf-engine listening on http://{}", addr);
            info!("Health check: http://{}/health", addr);

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// The only wall-clock read feeding analytics
fn resolve_as_of(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Local::now().date_naive())
}

/// User-facing message per fatal ingestion outcome
fn explain(err: IngestError) -> anyhow::Error {
    let message = match &err {
        IngestError::InvalidIdentifier(input) => format!(
            "Could not find a reader id in {:?}; pass a numeric id or a profile URL",
            input
        ),
        IngestError::ProfilePrivateOrInvalid(id) => format!(
            "Reader {}'s shelf is private or does not exist; the profile must be public",
            id
        ),
        IngestError::EmptyShelf(id) => {
            format!("Reader {} has not marked any books as read", id)
        }
        IngestError::NetworkFailure { attempts, message } => format!(
            "Feed unreachable after {} attempt(s) ({}); try again later",
            attempts, message
        ),
        IngestError::Common(e) => e.to_string(),
    };
    anyhow::Error::new(err).context(message)
}

fn read_json<T: serde::de::DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };
    serde_json::from_str(&text).context("Input is not the expected JSON document")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
