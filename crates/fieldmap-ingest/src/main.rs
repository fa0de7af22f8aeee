//! Fieldmap ingest - territory data ingestion tool

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use fieldmap_common::logging::{init_logging, LogConfig, LogLevel};
use fieldmap_ingest::adapters::SourceSpec;
use fieldmap_ingest::config::{self, Config};
use fieldmap_ingest::leaderboard;
use fieldmap_ingest::pipeline::{SalesPipeline, ZonePipeline};
use fieldmap_ingest::store::IngestStore;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fieldmap-ingest")]
#[command(author, version, about = "Fieldmap territory data ingestion tool")]
struct Cli {
    /// What to ingest
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Ingest sales exports into the sales_entries table
    Sales {
        /// Source export as KIND=PATH (repeatable), e.g. arcadia=./exports/dec.csv
        #[arg(short, long = "source", value_name = "KIND=PATH", required = true)]
        sources: Vec<SourceSpec>,
    },

    /// Ingest a GeoJSON boundary document into the territory_zones table
    Zones {
        /// Path to the GeoJSON FeatureCollection
        #[arg(short, long)]
        input: PathBuf,

        /// Classification stored on every zone from this document
        #[arg(short, long, default_value = "Census_Tract")]
        zone_type: String,

        /// Feature property holding the zone's display name
        #[arg(short, long, default_value = "NAMELSAD")]
        name_property: String,
    },

    /// Merge fresh monthly counts into the leaderboard feed
    Leaderboard {
        /// JSON object of per-rep counts keyed "repId|repName"
        #[arg(short, long)]
        counts: PathBuf,

        /// Leaderboard feed file to update
        #[arg(short, long)]
        feed: PathBuf,

        /// Merge and report without rewriting the feed
        #[arg(long)]
        dry_run: bool,
    },

    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("fieldmap-ingest")
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    match cli.command {
        Command::Sales { sources } => {
            info!("Ingesting sales exports");
            let store = connect_store().await?;
            let report = SalesPipeline::new(store).run(&sources).await?;
            info!("{}", report.summary());
            if report.has_failures() {
                bail!("One or more sources failed to write");
            }
        },
        Command::Zones {
            input,
            zone_type,
            name_property,
        } => {
            info!("Ingesting territory zones");
            let store = connect_store().await?;
            let report = ZonePipeline::new(store)
                .run(&input, &zone_type, &name_property)
                .await?;
            info!("{}", report.summary());
            if report.failed {
                bail!("Zone batch failed to write");
            }
        },
        Command::Leaderboard {
            counts,
            feed,
            dry_run,
        } => {
            info!("Updating leaderboard feed");
            leaderboard::update_feed(&counts, &feed, dry_run)?;
        },
        Command::Migrate => {
            info!("Running database migrations");
            let config = Config::load()?;
            let pool = config::create_pool(&config.database).await?;
            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            info!("Migrations applied");
        },
    }

    info!("Done");
    Ok(())
}

async fn connect_store() -> Result<IngestStore> {
    let config = Config::load()?;
    let pool = config::create_pool(&config.database).await?;
    let store = IngestStore::new(pool);
    store
        .health_check()
        .await
        .context("Database health check failed")?;
    Ok(store)
}
