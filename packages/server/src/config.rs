use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::kernel::pacing::PacingConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub naver: NaverConfig,
    pub kream: KreamConfig,
    pub coupang_search_base_url: String,
    /// Partner link API credentials. The link rewriter is disabled when absent.
    pub partners: Option<PartnersConfig>,
    /// Upper bound on a single adapter fetch
    pub adapter_timeout: Duration,
    /// Cron expression (with seconds) for the daily ingestion run
    pub ingest_cron: String,
    pub pacing: PacingConfig,
}

#[derive(Debug, Clone)]
pub struct NaverConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct KreamConfig {
    pub base_url: String,
    pub session_cookie: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PartnersConfig {
    pub base_url: String,
    pub access_key: String,
    pub secret_key: String,
    pub partner_id: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let partners = match (
            env::var("COUPANG_ACCESS_KEY").ok(),
            env::var("COUPANG_SECRET_KEY").ok(),
            env::var("COUPANG_PARTNER_ID").ok(),
        ) {
            (Some(access_key), Some(secret_key), Some(partner_id)) => Some(PartnersConfig {
                base_url: env::var("COUPANG_API_BASE_URL")
                    .unwrap_or_else(|_| "https://api-gateway.coupang.com".to_string()),
                access_key,
                secret_key,
                partner_id,
            }),
            _ => None,
        };

        let defaults = PacingConfig::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            naver: NaverConfig {
                base_url: env::var("NAVER_API_BASE_URL")
                    .unwrap_or_else(|_| "https://openapi.naver.com".to_string()),
                client_id: env::var("NAVER_CLIENT_ID").context("NAVER_CLIENT_ID must be set")?,
                client_secret: env::var("NAVER_CLIENT_SECRET")
                    .context("NAVER_CLIENT_SECRET must be set")?,
            },
            kream: KreamConfig {
                base_url: env::var("KREAM_API_BASE_URL")
                    .unwrap_or_else(|_| "https://api.kream.co.kr".to_string()),
                session_cookie: env::var("KREAM_SESSION_COOKIE").ok(),
            },
            coupang_search_base_url: env::var("COUPANG_SEARCH_BASE_URL")
                .unwrap_or_else(|_| "https://www.coupang.com".to_string()),
            partners,
            adapter_timeout: Duration::from_secs(parse_or("ADAPTER_TIMEOUT_SECS", 90)?),
            ingest_cron: env::var("INGEST_CRON").unwrap_or_else(|_| "0 0 3 * * *".to_string()),
            pacing: PacingConfig {
                batch_size: parse_or("REWRITE_BATCH_SIZE", defaults.batch_size)?,
                item_delay: Duration::from_millis(parse_or(
                    "REWRITE_ITEM_DELAY_MS",
                    defaults.item_delay.as_millis() as u64,
                )?),
                batch_delay: Duration::from_millis(parse_or(
                    "REWRITE_BATCH_DELAY_MS",
                    defaults.batch_delay.as_millis() as u64,
                )?),
            },
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}
