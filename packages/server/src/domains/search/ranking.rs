//! Source-biased ranking of merged search results.
//!
//! KREAM listings get +50, KREAM limited-edition listings a further +100. Everything else
//! weighs 0. The sort is stable, so equal weights keep their merge order.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::common::{Listing, Source};

pub const PREMIUM_BONUS: i32 = 50;
pub const LIMITED_EDITION_BONUS: i32 = 100;
pub const LIMITED_EDITION_CATEGORY: &str = "한정판";

/// A listing as returned to a live search caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub listing: Listing,
    pub weight: i32,
}

pub fn weight(listing: &Listing) -> i32 {
    if !listing
        .mall_name
        .eq_ignore_ascii_case(Source::Kream.mall_name())
    {
        return 0;
    }

    let mut weight = PREMIUM_BONUS;
    if listing.category.as_deref() == Some(LIMITED_EDITION_CATEGORY) {
        weight += LIMITED_EDITION_BONUS;
    }
    weight
}

/// Weigh every listing and order by weight, highest first
pub fn rank(listings: Vec<Listing>) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = listings
        .into_iter()
        .map(|listing| SearchResult {
            weight: weight(&listing),
            listing,
        })
        .collect();

    // sort_by_key is stable
    results.sort_by_key(|r| Reverse(r.weight));
    results
}
