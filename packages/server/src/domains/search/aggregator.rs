use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::ranking::{rank, SearchResult};
use crate::common::{Listing, Source};
use crate::domains::sources::SourceAdapter;

/// How a failing source affects the aggregate call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BranchPolicy {
    /// Return results from healthy sources alongside the per-source failures
    #[default]
    Isolate,
    /// Fail the whole call if any source fails
    FailFast,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search branch for {marketplace} failed: {message}")]
    BranchFailure { marketplace: Source, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: Source,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct AggregatedSearch {
    pub results: Vec<SearchResult>,
    pub failures: Vec<SourceFailure>,
}

/// Fans a live query out to every registered source in parallel.
///
/// One task is spawned per source, so the pool is exactly as wide as the source list.
/// The join waits for every branch; each adapter bounds its own fetch time. Branches keep
/// running if the caller stops waiting.
///
/// By default a failing source does not fail the call: its error is returned in
/// [`AggregatedSearch::failures`] next to the healthy sources' results. Use
/// [`BranchPolicy::FailFast`] for all-or-nothing searches.
pub struct SearchAggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    policy: BranchPolicy,
}

impl SearchAggregator {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self {
            adapters,
            policy: BranchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BranchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn search(&self, query: &str) -> Result<AggregatedSearch, SearchError> {
        let handles: Vec<_> = self
            .adapters
            .iter()
            .map(|adapter| {
                let adapter = adapter.clone();
                let query = query.to_string();
                let source = adapter.source();
                let handle = tokio::spawn(async move { adapter.fetch(&query).await });
                (source, handle)
            })
            .collect();

        let mut merged: Vec<Listing> = Vec::new();
        let mut failures = Vec::new();

        // Joined in registration order so the merge order is deterministic
        for (source, handle) in handles {
            match handle.await {
                Ok(Ok(listings)) => merged.extend(listings),
                Ok(Err(e)) => failures.push(SourceFailure {
                    source,
                    message: e.to_string(),
                }),
                Err(e) => failures.push(SourceFailure {
                    source,
                    message: format!("search task aborted: {}", e),
                }),
            }
        }

        for failure in &failures {
            warn!(source = %failure.source, query = %query, "Search branch failed: {}", failure.message);
        }

        if self.policy == BranchPolicy::FailFast {
            if let Some(failure) = failures.first() {
                return Err(SearchError::BranchFailure {
                    marketplace: failure.source,
                    message: failure.message.clone(),
                });
            }
        }

        let results = rank(merged);
        info!(
            query = %query,
            results = results.len(),
            failed_sources = failures.len(),
            "Search complete"
        );

        Ok(AggregatedSearch { results, failures })
    }
}
