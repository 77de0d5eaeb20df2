use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unexpected status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}
