//! Search domain - live fan-out search across every source
//!
//! Bypasses the catalog: each query goes straight to the adapters, results are merged in
//! registration order and ordered by [`ranking::weight`].

pub mod aggregator;
pub mod ranking;

pub use aggregator::{AggregatedSearch, BranchPolicy, SearchAggregator, SearchError, SourceFailure};
pub use ranking::{rank, weight, SearchResult};
