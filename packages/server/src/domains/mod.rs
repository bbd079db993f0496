// Business domains
pub mod affiliate;
pub mod ingestion;
pub mod matching;
pub mod products;
pub mod search;
pub mod sources;
