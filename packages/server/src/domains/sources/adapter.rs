use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::common::{Listing, Source};

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{marketplace} fetch timed out after {elapsed:?}")]
    Timeout { marketplace: Source, elapsed: Duration },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{marketplace} returned HTTP {status}: {body}")]
    Status {
        marketplace: Source,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {marketplace} response: {message}")]
    Parse { marketplace: Source, message: String },
}

/// Capability shared by every marketplace: keyword in, candidate listings out.
///
/// Implementations skip individual candidates that fail extraction (with a warning)
/// rather than failing the batch.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    async fn fetch(&self, keyword: &str) -> Result<Vec<Listing>, AdapterError>;
}

/// Enforces a wall-clock bound on another adapter's fetch.
///
/// On timeout the batch is empty and the run continues.
pub struct BoundedSource {
    inner: Arc<dyn SourceAdapter>,
    limit: Duration,
}

impl BoundedSource {
    pub fn new(inner: Arc<dyn SourceAdapter>, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl SourceAdapter for BoundedSource {
    fn source(&self) -> Source {
        self.inner.source()
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Listing>, AdapterError> {
        match tokio::time::timeout(self.limit, self.inner.fetch(keyword)).await {
            Ok(result) => result,
            Err(_) => {
                let err = AdapterError::Timeout {
                    marketplace: self.inner.source(),
                    elapsed: self.limit,
                };
                tracing::warn!(keyword = %keyword, "{}", err);
                Ok(Vec::new())
            }
        }
    }
}
