use reqwest::StatusCode;
use thiserror::Error;

/// Broad cause of a failed forecast fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Nothing was sent: the client is not configured.
    Configuration,
    /// The provider kept rate limiting after the retry.
    Transient,
    /// The provider answered with a non-retryable status.
    Http,
    /// The request never completed.
    Network,
    /// The response body was not a usable forecast.
    Payload,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(
        "No API key configured for provider '{provider}'.\n\
         Hint: run `forecast configure` or set TOMORROW_API_KEY."
    )]
    MissingApiKey { provider: &'static str },

    #[error("Provider is rate limiting requests (HTTP 429) after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Forecast request failed with status {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Failed to reach forecast provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse forecast JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected forecast payload: {0}")]
    Shape(String),
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::MissingApiKey { .. } => FailureKind::Configuration,
            FetchError::RateLimited { .. } => FailureKind::Transient,
            FetchError::Http { .. } => FailureKind::Http,
            FetchError::Transport(_) => FailureKind::Network,
            FetchError::Parse(_) | FetchError::Shape(_) => FailureKind::Payload,
        }
    }
}
