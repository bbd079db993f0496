//! Kernel module - infrastructure, dependency container and scheduling.

pub mod deps;
pub mod pacing;
pub mod run_lock;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PartnersAdapter, ServerDeps};
pub use pacing::{Pacer, PacingConfig};
pub use run_lock::{InProcessRunLock, PgRunLock, RunKind, RunLease};
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::{InMemoryCatalogStore, MockPartnerLinkService, MockSourceAdapter};
pub use traits::*;
