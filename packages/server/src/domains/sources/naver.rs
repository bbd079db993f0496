//! Naver shopping search API adapter.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{AdapterError, SourceAdapter};
use crate::common::{Listing, Source};
use crate::config::NaverConfig;

/// Maximum page size the shopping API allows
const DISPLAY: u32 = 100;

pub struct NaverAdapter {
    client: reqwest::Client,
    config: NaverConfig,
}

impl NaverAdapter {
    pub fn new(config: NaverConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }
}

#[derive(Debug, Deserialize)]
struct ShopResponse {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShopItem {
    title: String,
    link: String,
    #[serde(default)]
    image: Option<String>,
    lprice: String,
    product_id: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    category1: Option<String>,
}

#[async_trait]
impl SourceAdapter for NaverAdapter {
    fn source(&self) -> Source {
        Source::Naver
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Listing>, AdapterError> {
        let url = format!(
            "{}/v1/search/shop.json",
            self.config.base_url.trim_end_matches('/')
        );

        let display = DISPLAY.to_string();
        let response = self
            .client
            .get(&url)
            .header("X-Naver-Client-Id", &self.config.client_id)
            .header("X-Naver-Client-Secret", &self.config.client_secret)
            .query(&[("query", keyword), ("display", display.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Status {
                marketplace: Source::Naver,
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let listings = parse_shop_response(&body)?;
        debug!(keyword = %keyword, count = listings.len(), "Naver fetch complete");
        Ok(listings)
    }
}

/// Parse a shopping API response, skipping items that fail extraction
pub(crate) fn parse_shop_response(body: &str) -> Result<Vec<Listing>, AdapterError> {
    let response: ShopResponse = serde_json::from_str(body).map_err(|e| AdapterError::Parse {
        marketplace: Source::Naver,
        message: e.to_string(),
    })?;

    let listings = response
        .items
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<ShopItem>(raw) {
            Ok(item) => into_listing(item),
            Err(e) => {
                warn!("Skipping Naver item: {}", e);
                None
            }
        })
        .collect();

    Ok(listings)
}

fn into_listing(item: ShopItem) -> Option<Listing> {
    let price = match item.lprice.trim().parse::<i32>() {
        Ok(price) => price,
        Err(_) => {
            warn!(product_id = %item.product_id, lprice = %item.lprice, "Skipping Naver item: bad price");
            return None;
        }
    };

    Some(Listing {
        product_id: item.product_id,
        title: strip_highlight(&item.title),
        price,
        image: non_empty(item.image),
        mall_name: Source::Naver.mall_name().to_string(),
        link: item.link,
        brand: non_empty(item.brand),
        category: non_empty(item.category1),
    })
}

/// The search API wraps matched terms in `<b>` tags
fn strip_highlight(title: &str) -> String {
    title.replace("<b>", "").replace("</b>", "")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "lastBuildDate": "Sat, 01 Mar 2025 09:30:05 +0900",
        "total": 3,
        "start": 1,
        "display": 3,
        "items": [
            {
                "title": "록시땅 <b>핸드크림</b> 30ml",
                "link": "https://search.shopping.naver.com/catalog/1001",
                "image": "https://shopping-phinf.pstatic.net/1001.jpg",
                "lprice": "12000",
                "hprice": "",
                "mallName": "네이버",
                "productId": "1001",
                "productType": "1",
                "brand": "록시땅",
                "maker": "",
                "category1": "화장품/미용",
                "category2": "바디케어"
            },
            {
                "title": "broken item without id",
                "link": "https://search.shopping.naver.com/catalog/1002",
                "lprice": "5000"
            },
            {
                "title": "price is not a number",
                "link": "https://search.shopping.naver.com/catalog/1003",
                "lprice": "call us",
                "productId": "1003"
            }
        ]
    }"#;

    #[test]
    fn parses_items_and_skips_bad_ones() {
        let listings = parse_shop_response(RESPONSE).unwrap();

        assert_eq!(listings.len(), 1);
        let item = &listings[0];
        assert_eq!(item.product_id, "1001");
        assert_eq!(item.title, "록시땅 핸드크림 30ml");
        assert_eq!(item.price, 12000);
        assert_eq!(item.mall_name, "Naver");
        assert_eq!(item.brand.as_deref(), Some("록시땅"));
        assert_eq!(item.category.as_deref(), Some("화장품/미용"));
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let body = r#"{"items": [{
            "title": "t", "link": "https://l", "image": "", "lprice": "1",
            "productId": "9", "brand": " ", "category1": ""
        }]}"#;

        let listings = parse_shop_response(body).unwrap();
        assert_eq!(listings[0].image, None);
        assert_eq!(listings[0].brand, None);
        assert_eq!(listings[0].category, None);
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = parse_shop_response("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, AdapterError::Parse { .. }));
    }
}
