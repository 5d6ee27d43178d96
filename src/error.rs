use thiserror::Error;

#[derive(Error, Debug)]
pub enum BennyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Extraction service error: {0}")]
    Service(String),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BennyError>;
