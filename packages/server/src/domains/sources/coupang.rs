//! Coupang search page adapter (HTML scrape).
//!
//! Fetches the public search result page and extracts product cards with CSS selectors.
//! Product ids come from the canonical link (see [`derive_product_id`]); cards whose id
//! cannot be derived are dropped.

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::product_id::derive_product_id;
use super::{AdapterError, SourceAdapter};
use crate::common::{Listing, Source};

// Use a browser-like User-Agent to avoid bot detection
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.5735.90 Safari/537.36";

pub struct CoupangAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl CoupangAdapter {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl SourceAdapter for CoupangAdapter {
    fn source(&self) -> Source {
        Source::Coupang
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Listing>, AdapterError> {
        let url = format!("{}/np/search", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .query(&[("q", keyword), ("channel", "user")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Status {
                marketplace: Source::Coupang,
                status: status.as_u16(),
                body,
            });
        }

        let html = response.text().await?;
        let listings = parse_search_page(&html, &self.base_url)?;
        debug!(keyword = %keyword, count = listings.len(), "Coupang fetch complete");
        Ok(listings)
    }
}

struct CardSelectors {
    card: Selector,
    name: Selector,
    price: Selector,
    image: Selector,
    anchor: Selector,
}

impl CardSelectors {
    fn new() -> Result<Self, AdapterError> {
        Ok(Self {
            card: selector(".search-product")?,
            name: selector(".name")?,
            price: selector(".price-value")?,
            image: selector("img")?,
            anchor: selector("a")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, AdapterError> {
    Selector::parse(css).map_err(|e| AdapterError::Parse {
        marketplace: Source::Coupang,
        message: format!("invalid selector {}: {}", css, e),
    })
}

/// Extract product cards from a search result page, skipping cards that fail extraction
pub(crate) fn parse_search_page(html: &str, base_url: &str) -> Result<Vec<Listing>, AdapterError> {
    let selectors = CardSelectors::new()?;
    let base = Url::parse(base_url).map_err(|e| AdapterError::Parse {
        marketplace: Source::Coupang,
        message: format!("invalid base url {}: {}", base_url, e),
    })?;
    let document = Html::parse_document(html);

    let listings = document
        .select(&selectors.card)
        .filter_map(|card| match extract_card(card, &selectors, &base) {
            Ok(listing) => Some(listing),
            Err(reason) => {
                warn!("Skipping Coupang product card: {}", reason);
                None
            }
        })
        .collect();

    Ok(listings)
}

fn extract_card(card: ElementRef<'_>, selectors: &CardSelectors, base: &Url) -> Result<Listing, String> {
    let title = card
        .select(&selectors.name)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or("missing .name")?;

    let price_text: String = card
        .select(&selectors.price)
        .next()
        .ok_or("missing .price-value")?
        .text()
        .collect::<String>()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    let price = if price_text.is_empty() {
        0
    } else {
        price_text
            .parse::<i32>()
            .map_err(|e| format!("bad price {}: {}", price_text, e))?
    };

    let image = card
        .select(&selectors.image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| absolutize(base, src))
        .transpose()?;

    let href = card
        .select(&selectors.anchor)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or("missing a[href]")?;
    let link = absolutize(base, href)?;

    let product_id = derive_product_id(&link).map_err(|e| e.to_string())?;

    Ok(Listing {
        product_id,
        title,
        price,
        image,
        mall_name: Source::Coupang.mall_name().to_string(),
        link,
        brand: None,
        category: None,
    })
}

/// Resolve relative and protocol-relative URLs against the site origin
fn absolutize(base: &Url, href: &str) -> Result<String, String> {
    base.join(href)
        .map(String::from)
        .map_err(|e| format!("bad url {}: {}", href, e))
}
