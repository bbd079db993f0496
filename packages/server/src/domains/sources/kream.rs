//! KREAM suggest API adapter.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::{AdapterError, SourceAdapter};
use crate::common::{Listing, Source};
use crate::config::KreamConfig;

const PER_PAGE: u32 = 10;
const PRODUCT_URL_PREFIX: &str = "https://kream.co.kr/products/";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

pub struct KreamAdapter {
    client: reqwest::Client,
    config: KreamConfig,
}

impl KreamAdapter {
    pub fn new(config: KreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    products: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SuggestProduct {
    id: Value,
    name: String,
    #[serde(default)]
    price: Option<i32>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[async_trait]
impl SourceAdapter for KreamAdapter {
    fn source(&self) -> Source {
        Source::Kream
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Listing>, AdapterError> {
        let url = format!("{}/api/se/suggest", self.config.base_url.trim_end_matches('/'));
        let per_page = PER_PAGE.to_string();

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::REFERER, "https://kream.co.kr")
            .query(&[("per_page", per_page.as_str()), ("keyword", keyword)]);
        if let Some(cookie) = &self.config.session_cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Status {
                marketplace: Source::Kream,
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let listings = parse_suggest_response(&body)?;
        debug!(keyword = %keyword, count = listings.len(), "KREAM fetch complete");
        Ok(listings)
    }
}

pub(crate) fn parse_suggest_response(body: &str) -> Result<Vec<Listing>, AdapterError> {
    let response: SuggestResponse =
        serde_json::from_str(body).map_err(|e| AdapterError::Parse {
            marketplace: Source::Kream,
            message: e.to_string(),
        })?;

    let listings = response
        .products
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<SuggestProduct>(raw) {
            Ok(product) => into_listing(product),
            Err(e) => {
                warn!("Skipping KREAM product: {}", e);
                None
            }
        })
        .collect();

    Ok(listings)
}

fn into_listing(product: SuggestProduct) -> Option<Listing> {
    // ids arrive as numbers, occasionally as strings
    let id = match &product.id {
        Value::Number(n) => n.to_string(),
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        other => {
            warn!(id = %other, name = %product.name, "Skipping KREAM product: unusable id");
            return None;
        }
    };

    Some(Listing {
        link: format!("{}{}", PRODUCT_URL_PREFIX, id),
        product_id: id,
        title: product.name,
        price: product.price.unwrap_or(0),
        image: product.image_url.filter(|v| !v.is_empty()),
        mall_name: Source::Kream.mall_name().to_string(),
        brand: product.brand.filter(|v| !v.is_empty()),
        category: product.category.filter(|v| !v.is_empty()),
    })
}
