//! Outbound calls to the movie metadata API.
//!
//! [`Endpoint`] knows the four URL templates. [`Upstream`] performs one GET
//! and returns the raw body; [`HttpUpstream`] is the `reqwest` implementation
//! used in production.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::config::Credential;
use crate::error::{Error, UpstreamError};

/// One of the four upstream resources reelay relays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/search/movie?query=…`
    Search { query: String },
    /// `/movie/{id}?append_to_response=credits`
    Details { id: String },
    /// `/movie/{id}/similar`
    Similar { id: String },
    /// `/movie/{id}/recommendations`
    Recommendations { id: String },
}

impl Endpoint {
    /// Builds the full upstream URL, credential included.
    ///
    /// The identifier is inserted into the path as received from the client
    /// (already percent-encoded on the wire, never containing `/`). Query
    /// values go through form encoding, so `&`, `=` and spaces arrive
    /// upstream as part of a single value.
    pub fn url(&self, base: &Url, credential: &Credential) -> Result<Url, url::ParseError> {
        let root = base.as_str().trim_end_matches('/');
        let mut url = match self {
            Self::Search { .. } => Url::parse(&format!("{root}/search/movie"))?,
            Self::Details { id } => Url::parse(&format!("{root}/movie/{id}"))?,
            Self::Similar { id } => Url::parse(&format!("{root}/movie/{id}/similar"))?,
            Self::Recommendations { id } => {
                Url::parse(&format!("{root}/movie/{id}/recommendations"))?
            }
        };

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", credential.expose());
            match self {
                Self::Search { query } => {
                    pairs.append_pair("query", query);
                }
                Self::Details { .. } => {
                    pairs.append_pair("append_to_response", "credits");
                }
                Self::Similar { .. } | Self::Recommendations { .. } => {}
            }
        }

        Ok(url)
    }

    /// Generic message shown to the client when this call fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Search { .. } => "Error searching movies",
            Self::Details { .. } => "Error fetching movie details",
            Self::Similar { .. } => "Error fetching similar movies",
            Self::Recommendations { .. } => "Error fetching recommendations",
        }
    }
}

/// A single outbound GET returning the raw response body.
///
/// The status code is deliberately not part of the result: upstream error
/// payloads are relayed like any other body.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get(&self, url: Url) -> Result<Bytes, UpstreamError>;
}

/// `reqwest`-backed [`Upstream`]. One connection pool per process.
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("reelay/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { client: builder.build()? })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, url: Url) -> Result<Bytes, UpstreamError> {
        // reqwest errors print the full URL, api_key included.
        let res = self.client.get(url).send().await.map_err(reqwest::Error::without_url)?;
        Ok(res.bytes().await.map_err(reqwest::Error::without_url)?)
    }
}
