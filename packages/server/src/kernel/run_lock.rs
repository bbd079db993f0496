//! Exclusive run locks for ingestion and link rewriting.
//!
//! Scheduled and manual runs may live in different processes, so the production lock is a
//! Postgres advisory lock scoped to a transaction that the lease keeps open. Dropping the
//! lease rolls the transaction back and the server releases the lock, including when the
//! holding process dies.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::BaseRunLock;

/// Work that must never run twice at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    Ingestion,
    LinkRewrite,
}

impl RunKind {
    /// Advisory lock key, fixed per kind across every process sharing the database
    pub fn advisory_key(&self) -> i64 {
        match self {
            RunKind::Ingestion => 0x4341_5441_0001,
            RunKind::LinkRewrite => 0x4341_5441_0002,
        }
    }
}

/// Proof of holding a run lock; released on drop
pub struct RunLease {
    _held: Box<dyn Send>,
}

impl RunLease {
    pub fn new<T: Send + 'static>(held: T) -> Self {
        Self {
            _held: Box::new(held),
        }
    }
}

/// Run lock shared by every holder of a clone within one process
#[derive(Clone, Default)]
pub struct InProcessRunLock {
    ingestion: Arc<Mutex<()>>,
    link_rewrite: Arc<Mutex<()>>,
}

impl InProcessRunLock {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRunLock for InProcessRunLock {
    async fn try_acquire(&self, kind: RunKind) -> Result<Option<RunLease>> {
        let lock = match kind {
            RunKind::Ingestion => &self.ingestion,
            RunKind::LinkRewrite => &self.link_rewrite,
        };

        Ok(lock.clone().try_lock_owned().ok().map(RunLease::new))
    }
}

/// Run lock backed by `pg_try_advisory_xact_lock`, shared by every process on the database
#[derive(Clone)]
pub struct PgRunLock {
    pool: PgPool,
}

impl PgRunLock {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRunLock for PgRunLock {
    async fn try_acquire(&self, kind: RunKind) -> Result<Option<RunLease>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to open run lock transaction")?;

        let acquired = sqlx::query_scalar::<_, bool>("SELECT pg_try_advisory_xact_lock($1)")
            .bind(kind.advisory_key())
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("Failed to take {:?} run lock", kind))?;

        if !acquired {
            tracing::debug!(kind = ?kind, "Run lock held elsewhere");
            return Ok(None);
        }

        Ok(Some(RunLease::new(tx)))
    }
}
