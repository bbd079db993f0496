// Types shared between sources, the catalog and search
//
// Kept here so kernel and domain layers can both depend on them without cycles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplaces the catalog ingests from. The display label doubles as the stored `mall_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Naver,
    Coupang,
    Kream,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Naver, Source::Coupang, Source::Kream];

    pub fn mall_name(&self) -> &'static str {
        match self {
            Source::Naver => "Naver",
            Source::Coupang => "Coupang",
            Source::Kream => "KREAM",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mall_name())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.mall_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown source: {}", s))
    }
}

/// Unit of work for both ingestion and live search
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceQuery {
    pub keyword: String,
    pub source: Source,
}

impl SourceQuery {
    pub fn new(keyword: impl Into<String>, source: Source) -> Self {
        Self {
            keyword: keyword.into(),
            source,
        }
    }
}

/// A normalized candidate listing produced by a source adapter.
///
/// This is the write shape for the catalog and the read shape for live search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub product_id: String,
    pub title: String,
    /// Smallest currency unit
    pub price: i32,
    pub image: Option<String>,
    pub mall_name: String,
    pub link: String,
    pub brand: Option<String>,
    pub category: Option<String>,
}
