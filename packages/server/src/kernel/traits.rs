// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "rewrite every stored link") lives in domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BasePartnerLinkService)

use anyhow::Result;
use async_trait::async_trait;

use super::run_lock::{RunKind, RunLease};

// =============================================================================
// Partner Link Trait (Infrastructure - signed deeplink API)
// =============================================================================

#[async_trait]
pub trait BasePartnerLinkService: Send + Sync {
    /// Convert an ordinary product URL into a tracked partner short link.
    ///
    /// Errors cover signing failures, transport failures and non-success API codes alike;
    /// callers log and skip, nothing is retried.
    async fn create_partner_link(&self, original_url: &str) -> Result<String>;
}

// =============================================================================
// Run Lock Trait (Infrastructure - exclusive ingestion / rewrite runs)
// =============================================================================

#[async_trait]
pub trait BaseRunLock: Send + Sync {
    /// Try to take the exclusive lock for `kind` without waiting.
    ///
    /// `Ok(None)` means another holder, possibly in another process, has it. The lock is
    /// released when the returned lease is dropped.
    async fn try_acquire(&self, kind: RunKind) -> Result<Option<RunLease>>;
}
