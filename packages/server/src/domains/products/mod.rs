//! Products domain - the persisted catalog of marketplace listings
//!
//! A product row is keyed by its source-scoped `product_id`; ingestion upserts into it,
//! the link rewriter reads it back and replaces links in place.

pub mod models;
pub mod store;

pub use models::Product;
pub use store::{CatalogStore, PgCatalogStore, UpsertOutcome, UpsertSummary, MAX_LINK_LEN};
