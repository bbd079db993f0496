// Test dependencies - mock implementations for testing
//
// Provides mock adapters, an in-memory catalog and a mock partner service that can be
// injected into the orchestrator, aggregator and rewriter.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use super::BasePartnerLinkService;
use crate::common::{Listing, Source};
use crate::domains::products::store::rejection_reason;
use crate::domains::products::{CatalogStore, Product, UpsertOutcome, UpsertSummary};
use crate::domains::sources::{AdapterError, SourceAdapter};

// =============================================================================
// Mock Source Adapter
// =============================================================================

pub struct MockSourceAdapter {
    source: Source,
    responses: Arc<Mutex<HashMap<String, Vec<Listing>>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    fail_all: bool,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockSourceAdapter {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            responses: Arc::new(Mutex::new(HashMap::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
            fail_all: false,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Listings returned for `keyword`
    pub fn with_listings(self, keyword: &str, listings: Vec<Listing>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(keyword.to_string(), listings);
        self
    }

    /// Fail fetches for `keyword`
    pub fn failing_on(self, keyword: &str) -> Self {
        self.failing.lock().unwrap().insert(keyword.to_string());
        self
    }

    /// Fail every fetch
    pub fn always_failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Keywords fetched so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceAdapter for MockSourceAdapter {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Listing>, AdapterError> {
        self.calls.lock().unwrap().push(keyword.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_all || self.failing.lock().unwrap().contains(keyword) {
            return Err(AdapterError::Status {
                marketplace: self.source,
                status: 503,
                body: "mock failure".to_string(),
            });
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(keyword)
            .cloned()
            .unwrap_or_default())
    }
}

// =============================================================================
// In-memory Catalog Store
// =============================================================================

#[derive(Default)]
pub struct InMemoryCatalogStore {
    rows: Mutex<Vec<Product>>,
    fail_upserts: bool,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upsert returns an error
    pub fn failing_upserts() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_upserts: true,
        }
    }

    pub fn rows(&self) -> Vec<Product> {
        self.rows.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn upsert(&self, items: &[Listing], keyword: &str) -> Result<UpsertSummary> {
        if self.fail_upserts {
            anyhow::bail!("mock store unavailable");
        }

        let mut rows = self.rows.lock().unwrap();
        let mut summary = UpsertSummary::default();

        for item in items {
            if rejection_reason(item).is_some() {
                summary.record(UpsertOutcome::Skipped);
                continue;
            }

            match rows.iter_mut().find(|p| p.product_id == item.product_id) {
                Some(existing) => {
                    existing.merge_listing(item, keyword);
                    summary.record(UpsertOutcome::Updated);
                }
                None => {
                    let id = rows.iter().map(|p| p.id).max().unwrap_or(0) + 1;
                    rows.push(Product::from_listing(id, item, keyword));
                    summary.record(UpsertOutcome::Inserted);
                }
            }
        }

        Ok(summary)
    }

    async fn find_by_product_id(&self, product_id: &str) -> Result<Option<Product>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.product_id == product_id)
            .cloned())
    }

    async fn find_by_mall(&self, mall_name: &str) -> Result<Vec<Product>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.mall_name == mall_name)
            .cloned()
            .collect())
    }

    async fn find_by_keywords(&self, keywords: &[String], page: u32) -> Result<Vec<Product>> {
        let rows = self.rows.lock().unwrap();
        let page_size = crate::domains::products::store::KEYWORD_PAGE_SIZE as usize;

        Ok(keywords
            .iter()
            .flat_map(|keyword| {
                rows.iter()
                    .filter(move |p| &p.keyword == keyword)
                    .skip(page as usize * page_size)
                    .take(page_size)
                    .cloned()
            })
            .collect())
    }

    async fn update_link(&self, id: i64, link: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| anyhow::anyhow!("product {} not found", id))?;
        row.link = Some(link.to_string());
        Ok(())
    }
}

// =============================================================================
// Mock Partner Link Service
// =============================================================================

pub struct MockPartnerLinkService {
    failing: Arc<Mutex<HashSet<String>>>,
    calls: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl MockPartnerLinkService {
    pub fn new() -> Self {
        Self {
            failing: Arc::new(Mutex::new(HashSet::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reject calls for this original URL
    pub fn failing_for(self, original_url: &str) -> Self {
        self.failing
            .lock()
            .unwrap()
            .insert(original_url.to_string());
        self
    }

    /// Short link the mock hands out for `original_url`
    pub fn short_link_for(original_url: &str) -> String {
        format!(
            "https://link.coupang.com/a/{}",
            original_url.rsplit('/').next().unwrap_or_default()
        )
    }

    /// URLs requested so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// When each call arrived
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

impl Default for MockPartnerLinkService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePartnerLinkService for MockPartnerLinkService {
    async fn create_partner_link(&self, original_url: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((original_url.to_string(), Instant::now()));

        if self.failing.lock().unwrap().contains(original_url) {
            anyhow::bail!("Partner API rejected request (rCode 1): Invalid url");
        }

        Ok(Self::short_link_for(original_url))
    }
}
