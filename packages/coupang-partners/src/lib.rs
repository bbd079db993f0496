//! Coupang Partners open API client.
//!
//! Converts ordinary product URLs into tracked partner short links through the
//! HMAC-signed deeplink endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use coupang_partners::{PartnersClient, PartnersOptions};
//!
//! let client = PartnersClient::new(PartnersOptions {
//!     base_url: "https://api-gateway.coupang.com".into(),
//!     access_key: "ACCESS".into(),
//!     secret_key: "SECRET".into(),
//!     partner_id: "my-sub-id".into(),
//! });
//!
//! let short = client.create_deeplink("https://www.coupang.com/vp/products/123").await?;
//! ```

pub mod error;
pub mod signing;
pub mod types;

pub use error::{PartnersError, Result};
pub use signing::SignedRequest;
pub use types::{Deeplink, DeeplinkRequest, DeeplinkResponse};

use chrono::Utc;
use uuid::Uuid;

pub const DEEPLINK_PATH: &str = "/v2/providers/affiliate_open_api/apis/openapi/v1/deeplink";

#[derive(Debug, Clone)]
pub struct PartnersOptions {
    pub base_url: String,
    pub access_key: String,
    pub secret_key: String,
    /// Sent as `subId` to attribute clicks.
    pub partner_id: String,
}

#[derive(Debug, Clone)]
pub struct PartnersClient {
    client: reqwest::Client,
    options: PartnersOptions,
}

impl PartnersClient {
    pub fn new(options: PartnersOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
        }
    }

    pub fn with_client(client: reqwest::Client, options: PartnersOptions) -> Self {
        Self { client, options }
    }

    /// Request a partner short link for `original_url`.
    ///
    /// Succeeds only on `rCode == "0"` with a non-empty `data[0].shortenUrl`.
    /// No retries are attempted.
    pub async fn create_deeplink(&self, original_url: &str) -> Result<String> {
        let signed = SignedRequest::sign(&self.options.secret_key, "POST", DEEPLINK_PATH, Utc::now())?;
        let request_id = Uuid::new_v4().to_string();

        let body = DeeplinkRequest {
            coupang_urls: vec![original_url.to_string()],
            sub_id: self.options.partner_id.clone(),
        };

        let url = format!(
            "{}{}",
            self.options.base_url.trim_end_matches('/'),
            DEEPLINK_PATH
        );

        tracing::debug!(%request_id, signed_date = %signed.signed_date, "Calling partner deeplink API");

        let resp = self
            .client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                signed.authorization(&self.options.access_key),
            )
            .header("X-Request-Id", &request_id)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PartnersError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: DeeplinkResponse = resp.json().await?;
        into_short_url(parsed)
    }
}

fn into_short_url(resp: DeeplinkResponse) -> Result<String> {
    if !resp.is_success() {
        return Err(PartnersError::Rejected {
            code: resp.r_code,
            message: resp.r_message,
        });
    }

    resp.shorten_url()
        .map(str::to_string)
        .ok_or(PartnersError::MissingShortenUrl)
}
