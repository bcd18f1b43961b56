//! Errors surfaced by the REST client.

use thiserror::Error;

/// Errors that can occur when talking to the pizzeria backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, TLS, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the bearer token. The session has already been
    /// ended and the login route requested by the time this is returned.
    #[error("Unauthorized: please log in again")]
    Unauthorized,

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    /// The response body is not the JSON we expected.
    #[error("Parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The login response carried no token.
    #[error("Login response did not include a token")]
    MissingToken,
}

impl ApiError {
    /// HTTP status behind this error, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound(_) => Some(404),
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidUrl(_) | Self::MissingToken => None,
        }
    }
}
