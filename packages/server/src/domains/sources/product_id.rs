//! Stable external ids from canonical listing URLs.
//!
//! A product link such as `https://www.coupang.com/vp/products/7654321?itemId=1` is
//! decomposed positionally: the query is dropped and the path segment following
//! `products` is the id. Failure is reported instead of inventing an id, so the caller
//! drops the item and deduplication stays intact.

use thiserror::Error;

const ID_SEGMENT_MARKER: &str = "products";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot derive product id from link: {link}")]
pub struct IdDerivationError {
    pub link: String,
}

pub fn derive_product_id(link: &str) -> Result<String, IdDerivationError> {
    let without_query = link.split(['?', '#']).next().unwrap_or_default();

    let mut segments = without_query.split('/');
    segments
        .by_ref()
        .find(|segment| *segment == ID_SEGMENT_MARKER)
        .and_then(|_| segments.next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| IdDerivationError {
            link: link.to_string(),
        })
}
