use crate::models::ProductId;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response envelope: {0}")]
    Envelope(String),

    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cancelled by user")]
    Cancelled,

    #[error("Operation not supported by this backend: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
