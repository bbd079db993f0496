use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::plan::IngestionPlan;
use crate::common::{Source, SourceQuery};
use crate::domains::products::{CatalogStore, UpsertSummary};
use crate::domains::sources::SourceAdapter;
use crate::kernel::run_lock::{InProcessRunLock, RunKind};
use crate::kernel::BaseRunLock;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("An ingestion run is already in progress")]
    AlreadyRunning,

    #[error("Catalog store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

/// Result of one keyword within a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordOutcome {
    pub query: SourceQuery,
    pub candidates: usize,
    pub summary: UpsertSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionReport {
    pub outcomes: Vec<KeywordOutcome>,
}

impl IngestionReport {
    pub fn total_candidates(&self) -> usize {
        self.outcomes.iter().map(|o| o.candidates).sum()
    }

    pub fn total_inserted(&self) -> usize {
        self.outcomes.iter().map(|o| o.summary.inserted).sum()
    }

    pub fn total_updated(&self) -> usize {
        self.outcomes.iter().map(|o| o.summary.updated).sum()
    }

    /// Keywords that produced no candidates
    pub fn empty_queries(&self) -> impl Iterator<Item = &SourceQuery> {
        self.outcomes
            .iter()
            .filter(|o| o.candidates == 0)
            .map(|o| &o.query)
    }
}

/// Drives crawls across the plan's keyword sets and feeds the catalog.
///
/// A run is sequential across sources and keywords. Adapter failures for a keyword are
/// logged and count as an empty batch; a store failure ends the run early, keeping every
/// write already committed. Overlapping runs holding the same run lock are refused.
pub struct IngestionOrchestrator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    store: Arc<dyn CatalogStore>,
    plan: IngestionPlan,
    run_lock: Arc<dyn BaseRunLock>,
}

impl IngestionOrchestrator {
    pub fn new(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        store: Arc<dyn CatalogStore>,
        plan: IngestionPlan,
    ) -> Self {
        Self {
            adapters,
            store,
            plan,
            run_lock: Arc::new(InProcessRunLock::new()),
        }
    }

    /// Share a run lock with other orchestrators, in this process or others
    pub fn with_run_lock(mut self, run_lock: Arc<dyn BaseRunLock>) -> Self {
        self.run_lock = run_lock;
        self
    }

    pub fn plan(&self) -> &IngestionPlan {
        &self.plan
    }

    fn adapter_for(&self, source: Source) -> Option<&Arc<dyn SourceAdapter>> {
        self.adapters.iter().find(|a| a.source() == source)
    }

    /// Run the whole plan once (on-demand and scheduled entry point)
    pub async fn run(&self) -> Result<IngestionReport, IngestError> {
        let _lease = self
            .run_lock
            .try_acquire(RunKind::Ingestion)
            .await?
            .ok_or(IngestError::AlreadyRunning)?;

        info!(sources = self.plan.entries.len(), "Ingestion run started");
        let mut report = IngestionReport::default();

        for entry in &self.plan.entries {
            let Some(adapter) = self.adapter_for(entry.source) else {
                warn!(source = %entry.source, "No adapter registered, skipping source");
                continue;
            };

            info!(source = %entry.source, keywords = entry.keywords.len(), "Crawling source");
            for keyword in &entry.keywords {
                let outcome = self
                    .ingest_keyword(adapter.as_ref(), SourceQuery::new(keyword.clone(), entry.source))
                    .await?;
                report.outcomes.push(outcome);
            }
        }

        info!(
            keywords = report.outcomes.len(),
            candidates = report.total_candidates(),
            inserted = report.total_inserted(),
            updated = report.total_updated(),
            "Ingestion run complete"
        );
        Ok(report)
    }

    async fn ingest_keyword(
        &self,
        adapter: &dyn SourceAdapter,
        query: SourceQuery,
    ) -> Result<KeywordOutcome, IngestError> {
        debug!(source = %query.source, keyword = %query.keyword, "Fetching candidates");

        let listings = match adapter.fetch(&query.keyword).await {
            Ok(listings) => listings,
            Err(e) => {
                warn!(source = %query.source, keyword = %query.keyword, "Fetch failed: {}", e);
                Vec::new()
            }
        };

        info!(
            source = %query.source,
            keyword = %query.keyword,
            count = listings.len(),
            "Fetched candidates"
        );

        if listings.is_empty() {
            warn!(source = %query.source, keyword = %query.keyword, "No results for keyword");
            return Ok(KeywordOutcome {
                query,
                candidates: 0,
                summary: UpsertSummary::default(),
            });
        }

        let summary = self.store.upsert(&listings, &query.keyword).await?;
        info!(
            source = %query.source,
            keyword = %query.keyword,
            inserted = summary.inserted,
            updated = summary.updated,
            skipped = summary.skipped,
            "Stored candidates"
        );

        Ok(KeywordOutcome {
            query,
            candidates: listings.len(),
            summary,
        })
    }
}
