//! Source adapters - one per marketplace.
//!
//! Each adapter turns a keyword into normalized [`Listing`](crate::common::Listing)s. The
//! transport differs (REST API vs. HTML scrape) but callers only see [`SourceAdapter`].
//! Adapters are wrapped in [`BoundedSource`] so a slow marketplace yields an empty batch
//! instead of stalling ingestion or search.

mod adapter;
mod coupang;
mod kream;
mod naver;
pub mod product_id;

pub use adapter::{AdapterError, BoundedSource, SourceAdapter};
pub use coupang::CoupangAdapter;
pub use kream::KreamAdapter;
pub use naver::NaverAdapter;
pub use product_id::{derive_product_id, IdDerivationError};
