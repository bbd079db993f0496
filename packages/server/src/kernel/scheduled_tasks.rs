//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! One fixed daily trigger runs the ingestion orchestrator. A trigger missed while the
//! process was down is not backfilled; the next day's run is independent.
//!
//! ```text
//! Scheduler (daily, INGEST_CRON)
//!     │
//!     └─► IngestionOrchestrator::run()
//!             └─► For each source → for each keyword → fetch → CatalogStore::upsert
//! ```

use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::ingestion::{IngestError, IngestionOrchestrator};

/// Start all scheduled tasks
pub async fn start_scheduler(
    orchestrator: Arc<IngestionOrchestrator>,
    ingest_cron: &str,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let ingest_orchestrator = orchestrator.clone();
    let ingest_job = Job::new_async(ingest_cron, move |_uuid, _lock| {
        let orchestrator = ingest_orchestrator.clone();
        Box::pin(async move {
            run_scheduled_ingestion(&orchestrator).await;
        })
    })?;

    scheduler.add(ingest_job).await?;
    scheduler.start().await?;

    tracing::info!(cron = %ingest_cron, "Scheduled tasks started (daily ingestion)");
    Ok(scheduler)
}

/// Run the ingestion orchestrator once from the scheduler
async fn run_scheduled_ingestion(orchestrator: &IngestionOrchestrator) {
    tracing::info!("Running scheduled ingestion");

    match orchestrator.run().await {
        Ok(report) => tracing::info!(
            keywords = report.outcomes.len(),
            candidates = report.total_candidates(),
            inserted = report.total_inserted(),
            updated = report.total_updated(),
            "Scheduled ingestion complete"
        ),
        Err(IngestError::AlreadyRunning) => {
            tracing::warn!("Skipping scheduled ingestion: a run is already in progress")
        }
        Err(e) => tracing::error!("Scheduled ingestion failed: {}", e),
    }
}
