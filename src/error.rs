use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RarebirdError {
    #[error("invalid region code: {0}")]
    InvalidRegion(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("eBird request failed: {0}")]
    EbirdHttp(String),

    #[error("eBird returned status {status}: {message}")]
    EbirdStatus { status: u16, message: String },

    #[error("failed to decode eBird response: {0}")]
    EbirdDecode(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
