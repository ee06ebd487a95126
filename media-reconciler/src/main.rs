//! media-reconciler - Main entry point
//!
//! Thin CLI over the reconciliation engine: `check` (the default) scans the
//! population and prints the placement report; `--execute` additionally
//! relocates misplaced objects and updates record pointers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use media_reconciler::config::EngineConfig;
use media_reconciler::models::Category;
use media_reconciler::services::{RunMode, Scheduler};
use media_reconciler::stores::{HttpObjectStore, SqliteRecordStore};

/// Command-line arguments for media-reconciler
#[derive(Parser, Debug)]
#[command(name = "media-reconciler")]
#[command(about = "Reconcile media bucket placement against record pointers")]
#[command(version)]
struct Args {
    /// Relocate misplaced objects and update record pointers
    /// (without this flag the run is check-only)
    #[arg(long)]
    execute: bool,

    /// Quick profile: larger batches, shorter cooldowns, fewer retries
    #[arg(long)]
    quick: bool,

    /// Restrict the run to one account type
    /// (independent, trainer, club, agent, academy)
    #[arg(long, value_name = "TYPE", value_parser = parse_category)]
    account_type: Option<Category>,

    /// Path to TOML config file
    #[arg(short, long, env = "RECONCILER_CONFIG")]
    config: Option<PathBuf>,

    /// Object store base URL
    #[arg(long)]
    storage_url: Option<String>,

    /// Object store API key
    #[arg(long)]
    storage_key: Option<String>,

    /// Record store database path
    #[arg(long)]
    database: Option<String>,

    /// Subjects per batch
    #[arg(long)]
    batch_size: Option<usize>,
}

fn parse_category(raw: &str) -> std::result::Result<Category, String> {
    raw.parse()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_reconciler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = EngineConfig::load(args.config.as_deref())?;
    if args.quick {
        config.apply_quick_profile();
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(url) = args.storage_url {
        config.storage_url = url;
    }
    if let Some(key) = args.storage_key {
        config.storage_key = key;
    }
    if let Some(path) = args.database {
        config.database_path = path;
    }
    config.account_filter = args.account_type;

    let mode = if args.execute { RunMode::Execute } else { RunMode::Check };

    info!("Starting media-reconciler ({:?} mode)", mode);
    info!(
        "Batch size: {}, request delay: {}ms, batch delay: {}ms, retries: {}",
        config.batch_size, config.request_delay_ms, config.batch_delay_ms, config.max_attempts
    );

    let records = SqliteRecordStore::open(&config.database_path)
        .await
        .with_context(|| format!("open record store at {}", config.database_path))?;
    let objects = HttpObjectStore::from_config(&config).context("build object store client")?;

    let scheduler = Scheduler::new(&records, &objects, &config);
    let report = scheduler.run(mode).await.context("reconciliation run failed")?;

    print!("{}", report.render());

    Ok(())
}
