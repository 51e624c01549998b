//! Error types for the landmark API client.
//!
//! # Design
//! `ApiError` is the raw transport taxonomy: no response at all, a non-2xx
//! response, or a body of the wrong shape. A missing landmark is not given
//! its own variant; a 404 is an `Api` failure like any other status and
//! callers that care can inspect `status()`.
//!
//! `RepositoryError` is what the repositories hand to controllers. It wraps
//! every transport failure and adds the auth outcomes that have fixed
//! user-facing messages.

use thiserror::Error;

/// Failures surfaced by the transport and by `LandmarkClient::parse_*`.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No response was obtained (connection, TLS, timeout).
    #[error("network failure: {message}")]
    Network { message: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {}", detail_or_body(.message, .body))]
    Api {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("decode failure: {0}")]
    Decode(String),

    /// The request payload could not be encoded.
    #[error("encode failure: {0}")]
    Encode(String),
}

fn detail_or_body<'a>(message: &'a Option<String>, body: &'a str) -> &'a str {
    message.as_deref().unwrap_or(body)
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }

    /// HTTP status for `Api` failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Uniform failure type returned by the repositories.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Transport(#[from] ApiError),

    #[error("Login failed")]
    LoginFailed,

    #[error("Token refresh failed")]
    RefreshFailed,

    #[error("No refresh token")]
    NoRefreshToken,

    /// Rejected locally before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
