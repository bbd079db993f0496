//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container used by the binary and the
//! scheduler. Every external service is injected as a trait object so tests can swap in
//! the mocks from `test_dependencies`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use coupang_partners::{PartnersClient, PartnersOptions};
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::domains::affiliate::AffiliateLinkRewriter;
use crate::domains::ingestion::{IngestionOrchestrator, IngestionPlan};
use crate::domains::products::{CatalogStore, PgCatalogStore};
use crate::domains::search::{BranchPolicy, SearchAggregator};
use crate::domains::sources::{
    BoundedSource, CoupangAdapter, KreamAdapter, NaverAdapter, SourceAdapter,
};
use crate::kernel::pacing::PacingConfig;
use crate::kernel::run_lock::{InProcessRunLock, PgRunLock};
use crate::kernel::{BasePartnerLinkService, BaseRunLock};

// =============================================================================
// PartnersClient Adapter (implements BasePartnerLinkService trait)
// =============================================================================

/// Wrapper around PartnersClient that implements BasePartnerLinkService trait
pub struct PartnersAdapter(pub Arc<PartnersClient>);

impl PartnersAdapter {
    pub fn new(client: Arc<PartnersClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BasePartnerLinkService for PartnersAdapter {
    async fn create_partner_link(&self, original_url: &str) -> Result<String> {
        self.0
            .create_deeplink(original_url)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by the ingestion, search and rewrite paths
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn CatalogStore>,
    /// Every registered source, each already wrapped with the fetch time bound
    pub adapters: Vec<Arc<dyn SourceAdapter>>,
    /// Partner link service (disabled without credentials)
    pub partner_links: Option<Arc<dyn BasePartnerLinkService>>,
    /// Shared by every orchestrator and rewriter built from these deps
    pub run_lock: Arc<dyn BaseRunLock>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        adapters: Vec<Arc<dyn SourceAdapter>>,
        partner_links: Option<Arc<dyn BasePartnerLinkService>>,
    ) -> Self {
        Self {
            store,
            adapters,
            partner_links,
            run_lock: Arc::new(InProcessRunLock::new()),
        }
    }

    pub fn with_run_lock(mut self, run_lock: Arc<dyn BaseRunLock>) -> Self {
        self.run_lock = run_lock;
        self
    }

    /// Wire concrete adapters, the Postgres store and the partner client from config
    pub fn from_config(pool: PgPool, config: &Config) -> Result<Self> {
        let naver = NaverAdapter::new(config.naver.clone())
            .context("Failed to create Naver adapter")?;
        let kream = KreamAdapter::new(config.kream.clone())
            .context("Failed to create KREAM adapter")?;
        let coupang = CoupangAdapter::new(config.coupang_search_base_url.clone())
            .context("Failed to create Coupang adapter")?;

        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(BoundedSource::new(Arc::new(naver), config.adapter_timeout)),
            Arc::new(BoundedSource::new(Arc::new(coupang), config.adapter_timeout)),
            Arc::new(BoundedSource::new(Arc::new(kream), config.adapter_timeout)),
        ];

        let partner_links = config.partners.as_ref().map(|p| {
            let client = PartnersClient::new(PartnersOptions {
                base_url: p.base_url.clone(),
                access_key: p.access_key.clone(),
                secret_key: p.secret_key.clone(),
                partner_id: p.partner_id.clone(),
            });
            Arc::new(PartnersAdapter::new(Arc::new(client))) as Arc<dyn BasePartnerLinkService>
        });

        // Scheduled and manual runs are separate processes; they meet in the database
        Ok(Self::new(
            Arc::new(PgCatalogStore::new(pool.clone())),
            adapters,
            partner_links,
        )
        .with_run_lock(Arc::new(PgRunLock::new(pool))))
    }

    pub fn orchestrator(&self, plan: IngestionPlan) -> IngestionOrchestrator {
        IngestionOrchestrator::new(self.adapters.clone(), self.store.clone(), plan)
            .with_run_lock(self.run_lock.clone())
    }

    pub fn search_aggregator(&self, policy: BranchPolicy) -> SearchAggregator {
        SearchAggregator::new(self.adapters.clone()).with_policy(policy)
    }

    pub fn link_rewriter(&self, pacing: PacingConfig) -> Option<AffiliateLinkRewriter> {
        self.partner_links.as_ref().map(|partner| {
            AffiliateLinkRewriter::new(self.store.clone(), partner.clone(), pacing)
                .with_run_lock(self.run_lock.clone())
        })
    }
}
