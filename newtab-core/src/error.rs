use reqwest::StatusCode;

/// Errors surfaced by the storage, cache and provider layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl Error {
    /// Network-class failures are swallowed by the orchestrator (the panel
    /// simply stays hidden); everything else propagates to the caller.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Http { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
