//! Affiliate domain - rewrites stored product links into partner short links
//!
//! Reads a source's catalog rows, asks the partner API for a tracked link per row under a
//! fixed pacing schedule, and writes successful links back in place.

pub mod rewriter;

pub use rewriter::{AffiliateLinkRewriter, RecordOutcome, RewriteError, RewriteReport, RewriteState};
