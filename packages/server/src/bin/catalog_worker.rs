//! Catalog worker
//!
//! Runs the daily ingestion scheduler, or performs a single on-demand operation.

use anyhow::{Context, Result};
use catalog_core::common::Source;
use catalog_core::domains::ingestion::IngestionPlan;
use catalog_core::domains::search::BranchPolicy;
use catalog_core::kernel::{start_scheduler, ServerDeps};
use catalog_core::Config;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "catalog_worker")]
#[command(about = "Marketplace catalog ingestion, search and partner link rewriting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daily ingestion scheduler and wait for ctrl-c
    Run,

    /// Run one ingestion pass now
    Crawl,

    /// Rewrite stored links for a source into partner links
    RewriteLinks {
        #[arg(long, default_value = "coupang")]
        source: Source,
    },

    /// Live search across every source, printed as JSON
    Search {
        query: String,
        /// Fail the whole search if any source fails
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let pool = connect(&config).await?;
    let deps = ServerDeps::from_config(pool, &config)?;

    match cli.command {
        Commands::Run => {
            let orchestrator = Arc::new(deps.orchestrator(IngestionPlan::default()));
            let mut scheduler = start_scheduler(orchestrator, &config.ingest_cron).await?;

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutting down scheduler");
            scheduler.shutdown().await?;
        }
        Commands::Crawl => {
            let report = deps.orchestrator(IngestionPlan::default()).run().await?;
            for query in report.empty_queries() {
                tracing::warn!(source = %query.source, keyword = %query.keyword, "Keyword returned nothing");
            }
            println!(
                "Ingested {} candidates ({} new, {} updated)",
                report.total_candidates(),
                report.total_inserted(),
                report.total_updated()
            );
        }
        Commands::RewriteLinks { source } => {
            let rewriter = deps
                .link_rewriter(config.pacing.clone())
                .context("COUPANG_ACCESS_KEY, COUPANG_SECRET_KEY and COUPANG_PARTNER_ID must be set")?;
            let report = rewriter.rewrite_source(source).await?;
            println!(
                "Rewrote {} of {} {} links ({} skipped)",
                report.updated, report.total, source, report.skipped
            );
        }
        Commands::Search { query, strict } => {
            let policy = if strict {
                BranchPolicy::FailFast
            } else {
                BranchPolicy::Isolate
            };
            let search = deps.search_aggregator(policy).search(&query).await?;
            for failure in &search.failures {
                tracing::warn!(source = %failure.source, "Source failed: {}", failure.message);
            }
            println!("{}", serde_json::to_string_pretty(&search.results)?);
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}
