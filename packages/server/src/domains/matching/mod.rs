//! Matching domain - identical-title price comparison across sources
//!
//! Not semantic matching: two listings match only when their titles are equal after
//! dropping everything but ASCII letters and digits and lowercasing. Titles with no ASCII
//! alphanumerics at all never match.

use crate::common::Listing;

/// Title key used for comparison
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn titles_match(a: &Listing, b: &Listing) -> bool {
    let key = normalize_title(&a.title);
    !key.is_empty() && key == normalize_title(&b.title)
}

/// The cheaper of two matching listings (ties go to `other`), or `None` when titles differ
pub fn cheaper_of<'a>(candidate: &'a Listing, other: &'a Listing) -> Option<&'a Listing> {
    if !titles_match(candidate, other) {
        return None;
    }

    if candidate.price < other.price {
        Some(candidate)
    } else {
        Some(other)
    }
}
