// Marketplace Catalog - ingestion, live search and partner link rewriting core
//
// Keeps a searchable catalog of marketplace listings fresh, fans live queries out to
// every source, and periodically rewrites stored links into signed partner URLs.
// Architecture follows the domain layout in domains/*; infrastructure lives in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
