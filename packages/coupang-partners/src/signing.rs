//! HMAC-SHA256 request signing for the partner API.
//!
//! The signed message is `signedDate + method + path + query`, where `signedDate` is the
//! request time in GMT formatted as `yyMMdd'T'HHmmss'Z'`. The signature travels in the
//! `Authorization` header:
//!
//! ```text
//! CEA algorithm=HmacSHA256, access-key=<key>, signed-date=<date>, signature=<hex>
//! ```

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{PartnersError, Result};

type HmacSha256 = Hmac<Sha256>;

const SIGNED_DATE_FORMAT: &str = "%y%m%dT%H%M%SZ";

/// A signed request envelope. Built once per outbound call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub signed_date: String,
    pub signature: String,
}

impl SignedRequest {
    /// Sign `method` + `uri` at the given instant. `uri` may carry a `?query` suffix.
    pub fn sign(secret_key: &str, method: &str, uri: &str, at: DateTime<Utc>) -> Result<Self> {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };

        let signed_date = format_signed_date(at);
        let signature = signature(secret_key, &signed_date, method, path, query)?;

        Ok(Self {
            method: method.to_string(),
            path: path.to_string(),
            query: query.to_string(),
            signed_date,
            signature,
        })
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self, access_key: &str) -> String {
        format!(
            "CEA algorithm=HmacSHA256, access-key={}, signed-date={}, signature={}",
            access_key, self.signed_date, self.signature
        )
    }
}

pub fn format_signed_date(at: DateTime<Utc>) -> String {
    at.format(SIGNED_DATE_FORMAT).to_string()
}

/// Hex-encoded HMAC-SHA256 over `signed_date + method + path + query`.
pub fn signature(
    secret_key: &str,
    signed_date: &str,
    method: &str,
    path: &str,
    query: &str,
) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| PartnersError::Signing(e.to_string()))?;
    mac.update(signed_date.as_bytes());
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
