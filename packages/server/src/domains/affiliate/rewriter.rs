use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::common::Source;
use crate::domains::products::{CatalogStore, Product, MAX_LINK_LEN};
use crate::kernel::pacing::{Pacer, PacingConfig};
use crate::kernel::run_lock::{InProcessRunLock, RunKind};
use crate::kernel::{BasePartnerLinkService, BaseRunLock};

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("A link rewrite pass is already in progress")]
    AlreadyRunning,

    #[error("Catalog store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

/// Per-record lifecycle within one pass.
///
/// `Pending → Signing → Called → {Updated | SkippedError}`; both end states are terminal
/// until the next pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteState {
    Pending,
    Signing,
    Called,
    Updated,
    SkippedError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub product_id: String,
    pub state: RewriteState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    pub outcomes: Vec<RecordOutcome>,
}

impl RewriteReport {
    fn record(&mut self, product_id: &str, state: RewriteState) {
        match state {
            RewriteState::Updated => self.updated += 1,
            _ => self.skipped += 1,
        }
        self.outcomes.push(RecordOutcome {
            product_id: product_id.to_string(),
            state,
        });
    }
}

/// Rewrites stored links for one source into partner links.
///
/// Records are handled one at a time in batches; a failed call leaves that record untouched
/// and the pass moves on. A store failure ends the pass, keeping links already written.
pub struct AffiliateLinkRewriter {
    store: Arc<dyn CatalogStore>,
    partner: Arc<dyn BasePartnerLinkService>,
    pacing: PacingConfig,
    run_lock: Arc<dyn BaseRunLock>,
}

impl AffiliateLinkRewriter {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        partner: Arc<dyn BasePartnerLinkService>,
        pacing: PacingConfig,
    ) -> Self {
        Self {
            store,
            partner,
            pacing,
            run_lock: Arc::new(InProcessRunLock::new()),
        }
    }

    pub fn with_run_lock(mut self, run_lock: Arc<dyn BaseRunLock>) -> Self {
        self.run_lock = run_lock;
        self
    }

    pub async fn rewrite_source(&self, source: Source) -> Result<RewriteReport, RewriteError> {
        let _lease = self
            .run_lock
            .try_acquire(RunKind::LinkRewrite)
            .await?
            .ok_or(RewriteError::AlreadyRunning)?;

        let products = self.store.find_by_mall(source.mall_name()).await?;
        info!(source = %source, count = products.len(), "Link rewrite pass started");

        let batch_size = self.pacing.batch_size.max(1);
        let mut pacer = Pacer::new(self.pacing.clone());
        let mut report = RewriteReport {
            total: products.len(),
            ..Default::default()
        };

        for (index, batch) in products.chunks(batch_size).enumerate() {
            debug!(batch = index + 1, size = batch.len(), "Processing rewrite batch");
            for product in batch {
                let state = self.rewrite_one(product, &mut pacer).await?;
                report.record(&product.product_id, state);
            }
        }

        info!(
            source = %source,
            total = report.total,
            updated = report.updated,
            skipped = report.skipped,
            "Link rewrite pass complete"
        );
        Ok(report)
    }

    async fn rewrite_one(
        &self,
        product: &Product,
        pacer: &mut Pacer,
    ) -> Result<RewriteState, RewriteError> {
        let mut state = RewriteState::Pending;

        let Some(original) = product.link.as_deref().filter(|l| !l.is_empty()) else {
            warn!(product_id = %product.product_id, "No stored link to rewrite");
            return Ok(RewriteState::SkippedError);
        };

        pacer.ready().await;
        advance(&mut state, RewriteState::Signing, product);

        let result = self.partner.create_partner_link(original).await;
        advance(&mut state, RewriteState::Called, product);

        match result {
            Ok(partner_link) if partner_link.chars().count() <= MAX_LINK_LEN => {
                self.store.update_link(product.id, &partner_link).await?;
                info!(product_id = %product.product_id, link = %partner_link, "Partner link stored");
                advance(&mut state, RewriteState::Updated, product);
            }
            Ok(partner_link) => {
                warn!(
                    product_id = %product.product_id,
                    len = partner_link.len(),
                    "Partner link too long to store"
                );
                advance(&mut state, RewriteState::SkippedError, product);
            }
            Err(e) => {
                warn!(product_id = %product.product_id, "Partner link generation failed: {:#}", e);
                advance(&mut state, RewriteState::SkippedError, product);
            }
        }

        Ok(state)
    }
}

fn advance(state: &mut RewriteState, next: RewriteState, product: &Product) {
    debug!(product_id = %product.product_id, from = ?*state, to = ?next, "Rewrite state");
    *state = next;
}
