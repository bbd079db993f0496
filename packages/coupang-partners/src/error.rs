use thiserror::Error;

pub type Result<T> = std::result::Result<T, PartnersError>;

#[derive(Debug, Error)]
pub enum PartnersError {
    #[error("Failed to sign request: {0}")]
    Signing(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Partner API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Partner API rejected request (rCode {code}): {message}")]
    Rejected { code: String, message: String },

    #[error("Partner API response contained no shortenUrl")]
    MissingShortenUrl,
}
