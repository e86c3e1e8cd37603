use reqwest::StatusCode;
use thiserror::Error;

/// Message shown to users for any failed request; causes are only logged.
pub const GENERIC_FAILURE_MESSAGE: &str = "request failed";

/// The single failure kind of the store and import seams.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(StatusCode),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status(status) => Some(*status),
            FetchError::Transport(err) => err.status(),
            FetchError::Decode(_) => None,
        }
    }

    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::Status(status)
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err)
        }
    }
}
