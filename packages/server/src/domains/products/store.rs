//! Catalog persistence boundary.
//!
//! `upsert` is keyed by `product_id`: an unseen id inserts a row, a known id overwrites
//! `title`, `price`, `image`, `link`, `mall_name` and `keyword` in place while the surrogate
//! `id` is preserved. There is no versioning; concurrent writers to one id race and the
//! last write wins.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::models::Product;
use crate::common::Listing;

/// Column limit on `products.link`
pub const MAX_LINK_LEN: usize = 2048;

/// Page size used by keyword lookups
pub const KEYWORD_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl UpsertSummary {
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert unseen listings and overwrite known ones, stamping each with `keyword`.
    async fn upsert(&self, items: &[Listing], keyword: &str) -> Result<UpsertSummary>;

    async fn find_by_product_id(&self, product_id: &str) -> Result<Option<Product>>;

    /// All rows for one source, oldest first
    async fn find_by_mall(&self, mall_name: &str) -> Result<Vec<Product>>;

    /// Up to 20 rows per keyword for the given zero-based page, concatenated in keyword order
    async fn find_by_keywords(&self, keywords: &[String], page: u32) -> Result<Vec<Product>>;

    async fn update_link(&self, id: i64, link: &str) -> Result<()>;
}

/// Why a listing cannot be stored, if it cannot
pub fn rejection_reason(item: &Listing) -> Option<&'static str> {
    if item.product_id.trim().is_empty() {
        return Some("empty product id");
    }
    if item.link.chars().count() > MAX_LINK_LEN {
        return Some("link exceeds 2048 characters");
    }
    None
}

/// Postgres-backed catalog
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert_one(&self, item: &Listing, keyword: &str) -> Result<UpsertOutcome> {
        // xmax is zero only for freshly inserted tuples
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO products
                (product_id, title, price, image, mall_name, link, brand, category, keyword)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (product_id) DO UPDATE
            SET title = EXCLUDED.title,
                price = EXCLUDED.price,
                image = EXCLUDED.image,
                link = EXCLUDED.link,
                mall_name = EXCLUDED.mall_name,
                keyword = EXCLUDED.keyword,
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(&item.product_id)
        .bind(&item.title)
        .bind(item.price)
        .bind(&item.image)
        .bind(&item.mall_name)
        .bind(&item.link)
        .bind(&item.brand)
        .bind(&item.category)
        .bind(keyword)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to upsert product {}", item.product_id))?;

        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }
}

const PRODUCT_COLUMNS: &str =
    "id, product_id, title, price, image, mall_name, link, brand, category, keyword";

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn upsert(&self, items: &[Listing], keyword: &str) -> Result<UpsertSummary> {
        let mut summary = UpsertSummary::default();

        for item in items {
            if let Some(reason) = rejection_reason(item) {
                tracing::warn!(product_id = %item.product_id, reason, "Skipping listing");
                summary.record(UpsertOutcome::Skipped);
                continue;
            }
            summary.record(self.upsert_one(item, keyword).await?);
        }

        Ok(summary)
    }

    async fn find_by_product_id(&self, product_id: &str) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE product_id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch product")
    }

    async fn find_by_mall(&self, mall_name: &str) -> Result<Vec<Product>> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE mall_name = $1 ORDER BY id ASC",
            PRODUCT_COLUMNS
        ))
        .bind(mall_name)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch products by mall")
    }

    async fn find_by_keywords(&self, keywords: &[String], page: u32) -> Result<Vec<Product>> {
        let offset = i64::from(page) * KEYWORD_PAGE_SIZE;
        let mut products = Vec::new();

        for keyword in keywords {
            let rows = sqlx::query_as::<_, Product>(&format!(
                "SELECT {} FROM products WHERE keyword = $1 ORDER BY id ASC LIMIT $2 OFFSET $3",
                PRODUCT_COLUMNS
            ))
            .bind(keyword)
            .bind(KEYWORD_PAGE_SIZE)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch products for keyword {}", keyword))?;
            products.extend(rows);
        }

        Ok(products)
    }

    async fn update_link(&self, id: i64, link: &str) -> Result<()> {
        sqlx::query("UPDATE products SET link = $1, updated_at = NOW() WHERE id = $2")
            .bind(link)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update product link")?;
        Ok(())
    }
}
