//! Artifactory client errors.

use serde::Deserialize;
use thiserror::Error;

/// Result type for Artifactory calls.
pub type Result<T> = std::result::Result<T, ArtifError>;

/// Errors raised while talking to Artifactory.
#[derive(Debug, Error)]
pub enum ArtifError {
    /// Missing or invalid client settings.
    #[error("{0}")]
    Config(String),

    /// Transport failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("{status}: {message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// First error message from the body, or the raw body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("unable to decode {what}: {source}")]
    Decode {
        /// What was being decoded.
        what: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: String,
}

impl ArtifError {
    /// Creates a `Config` error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a `Decode` error.
    #[must_use]
    pub fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }

    /// Builds an `Api` error from a status and the response body, which
    /// is usually `{"errors":[{"status":..,"message":..}]}`.
    #[must_use]
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.errors.into_iter().map(|e| e.message).find(|m| !m.is_empty()))
            .unwrap_or_else(|| body.trim().to_string());
        Self::Api { status, message }
    }

    /// HTTP status of an `Api` error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
