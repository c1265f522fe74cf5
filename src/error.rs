//! Error types for the try-on pipeline, its transport and its configuration

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{FallbackReason, Outcome};
use crate::session::Phase;

/// Failures a caller of the try-on pipeline can observe
#[derive(Error, Debug)]
pub enum TryOnError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Try-on session is {actual:?}, expected {expected}")]
    InvalidState { actual: Phase, expected: &'static str },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl TryOnError {
    /// Outcome tag for failures that end an upload attempt
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            TryOnError::Validation(_) => Some(Outcome::ValidationRejected),
            TryOnError::Read { .. } => Some(Outcome::ReadFailure),
            TryOnError::InvalidState { .. } | TryOnError::Client(_) => None,
        }
    }
}

/// Failures of the remote inference call. Never returned to callers of the
/// gateway; each one selects the simulated fallback.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("inference API returned status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("malformed response body: {0}")]
    Malformed(#[source] reqwest::Error),

    #[error("response has no modelOutputs.output_image")]
    MissingOutput,
}

impl TransportError {
    pub fn reason(&self) -> FallbackReason {
        match self {
            TransportError::Timeout => FallbackReason::Timeout,
            TransportError::Status(status) => FallbackReason::HttpStatus { status: *status },
            TransportError::Network(_) => FallbackReason::Network,
            TransportError::Malformed(_) => FallbackReason::MalformedResponse,
            TransportError::MissingOutput => FallbackReason::MissingOutput,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_decode() {
            TransportError::Malformed(err)
        } else {
            TransportError::Network(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find app data directory")]
    NoDataDir,

    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("data URL is not base64 encoded")]
    NotBase64DataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}
