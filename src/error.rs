//! Error types.
//!
//! Two layers, split by who gets to see them:
//!
//! - [`Error`] covers infrastructure failures (binding the port, reading
//!   configuration, building the HTTP client). It is returned from
//!   [`Server::serve`](crate::Server::serve) and `main`, never sent to a client.
//! - [`RelayError`] covers a single relayed request and converts into the
//!   JSON error response the browser receives.

use http::StatusCode;
use thiserror::Error;

use crate::response::{IntoResponse, Response};

/// Message returned with HTTP 400 when no credential is configured.
pub const MISSING_CREDENTIAL: &str = "API key not set in .env file";

/// Infrastructure error returned by reelay's fallible setup operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failure while contacting the upstream API.
///
/// The variants exist for server-side logs only. Every one of them reaches
/// the client as the same generic 500 body.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Never carries the request URL: its query string holds the key.
    #[error("transport: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("response is not JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.without_url())
    }
}

/// Why a relayed request did not produce an upstream body.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No credential configured. Detected before any outbound call.
    #[error("{}", MISSING_CREDENTIAL)]
    Configuration,

    /// The outbound call failed. `message` is the generic text shown to the
    /// client; `source` stays in the logs.
    #[error("{message}: {source}")]
    Upstream {
        message: &'static str,
        #[source]
        source: UpstreamError,
    },
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            Self::Configuration => Response::error_json(StatusCode::BAD_REQUEST, MISSING_CREDENTIAL),
            Self::Upstream { message, .. } => {
                Response::error_json(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}
