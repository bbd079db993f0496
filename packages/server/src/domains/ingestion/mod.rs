//! Ingestion domain - keeps the catalog fresh
//!
//! A run walks the [`IngestionPlan`] source by source and keyword by keyword, fetching from
//! the matching adapter and upserting non-empty batches into the catalog. Keywords are
//! processed sequentially to stay under each marketplace's automation and quota limits.

pub mod orchestrator;
pub mod plan;

pub use orchestrator::{IngestError, IngestionOrchestrator, IngestionReport, KeywordOutcome};
pub use plan::{IngestionPlan, SourceKeywords};
