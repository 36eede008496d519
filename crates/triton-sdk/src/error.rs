//! Error types for CloudAPI and Manta operations.
//!
//! Remote failures carry the HTTP status and the symbolic code from the
//! response body in an [`ApiError`]. [`is_code`] and [`is_status`] walk an
//! arbitrary error's cause chain looking for one.

use std::error::Error as StdError;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;

/// A failure reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// HTTP status code.
    #[serde(skip)]
    pub status_code: u16,
    /// Symbolic code such as `ResourceNotFound`.
    #[serde(default)]
    pub code: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    /// Creates an API error.
    #[must_use]
    pub fn new(status_code: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Decodes a response body, falling back to the raw text.
    #[must_use]
    pub fn from_body(status_code: u16, body: &str) -> Self {
        match serde_json::from_str::<Self>(body) {
            Ok(mut err) => {
                err.status_code = status_code;
                err
            }
            Err(_) => Self::new(status_code, "", body.trim()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code.is_empty(), self.message.is_empty()) {
            (true, true) => write!(f, "{} {}", self.status_code, status_text(self.status_code)),
            (true, false) => f.write_str(&self.message),
            (false, true) => f.write_str(&self.code),
            (false, false) => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl StdError for ApiError {}

fn status_text(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
}

/// Errors that can occur while talking to Triton services.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Missing or invalid client settings.
    #[error("{0}")]
    Config(String),

    /// The signing key could not be loaded.
    #[error("unable to load signing key: {0}")]
    Key(String),

    /// Transport failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// The response body did not match the expected shape.
    #[error("unable to decode {what}: {source}")]
    Decode {
        /// What was being decoded.
        what: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A lookup by name found nothing.
    #[error("{kind} \"{name}\" not found")]
    NotFound {
        /// Resource kind.
        kind: &'static str,
        /// Name searched for.
        name: String,
    },

    /// Polling gave up before the resource reached the wanted state.
    #[error("timed out waiting for {what}")]
    Timeout {
        /// What was awaited.
        what: String,
    },
}

impl SdkError {
    /// Creates a `Config` error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a `Key` error.
    #[must_use]
    pub fn key(message: impl Into<String>) -> Self {
        Self::Key(message.into())
    }

    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Creates a `Decode` error.
    #[must_use]
    pub fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }
}

/// Finds the first [`ApiError`] in `err`'s cause chain.
pub fn find_api_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ApiError> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(api) = e.downcast_ref::<ApiError>() {
            return Some(api);
        }
        current = e.source();
    }
    None
}

/// Whether `err` is a remote error with symbolic code `code`.
pub fn is_code(err: &(dyn StdError + 'static), code: &str) -> bool {
    find_api_error(err).is_some_and(|api| api.code == code)
}

/// Whether `err` is a remote error with HTTP status `status`.
pub fn is_status(err: &(dyn StdError + 'static), status: u16) -> bool {
    find_api_error(err).is_some_and(|api| api.status_code == status)
}
