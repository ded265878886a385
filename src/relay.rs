//! The relay: four routes, one shape.
//!
//! Every route checks for a credential, builds one upstream URL, performs
//! one GET and hands the upstream body back verbatim. There is no retry,
//! no caching and no state shared between requests.
//!
//! | Route | Upstream |
//! |---|---|
//! | `GET /api/search?query=…` | `/search/movie` |
//! | `GET /api/movie/{id}` | `/movie/{id}?append_to_response=credits` |
//! | `GET /api/movie/{id}/similar` | `/movie/{id}/similar` |
//! | `GET /api/movie/{id}/recommendations` | `/movie/{id}/recommendations` |

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::{Config, Credential};
use crate::error::{RelayError, UpstreamError};
use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::upstream::{Endpoint, Upstream};

/// Shared relay state: the credential, the upstream root and the client.
pub struct Relay {
    credential: Option<Credential>,
    base: Url,
    upstream: Arc<dyn Upstream>,
}

impl Relay {
    pub fn new(config: &Config, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            credential: config.credential.clone(),
            base: config.upstream_base.clone(),
            upstream,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// `GET /api/search?query=…`. A missing query is sent upstream as empty.
    pub async fn search(&self, req: Request) -> Result<Response, RelayError> {
        info!(api_key_present = self.has_credential(), "search request received");
        let query = req.query("query").unwrap_or_default();
        self.relay(Endpoint::Search { query }).await
    }

    /// `GET /api/movie/{id}`, credits included.
    pub async fn movie_details(&self, req: Request) -> Result<Response, RelayError> {
        let id = path_id(&req);
        info!(%id, api_key_present = self.has_credential(), "movie details request received");
        self.relay(Endpoint::Details { id }).await
    }

    /// `GET /api/movie/{id}/similar`.
    pub async fn similar_movies(&self, req: Request) -> Result<Response, RelayError> {
        let id = path_id(&req);
        info!(%id, api_key_present = self.has_credential(), "similar movies request received");
        self.relay(Endpoint::Similar { id }).await
    }

    /// `GET /api/movie/{id}/recommendations`.
    pub async fn recommendations(&self, req: Request) -> Result<Response, RelayError> {
        let id = path_id(&req);
        info!(%id, api_key_present = self.has_credential(), "recommendations request received");
        self.relay(Endpoint::Recommendations { id }).await
    }

    async fn relay(&self, endpoint: Endpoint) -> Result<Response, RelayError> {
        let Some(credential) = &self.credential else {
            warn!("TMDB_API_KEY is not set, refusing to call upstream");
            return Err(RelayError::Configuration);
        };

        let message = endpoint.failure_message();
        let fail = |source: UpstreamError| {
            error!(error = %source, "{message}");
            RelayError::Upstream { message, source }
        };

        let url = endpoint.url(&self.base, credential).map_err(|e| fail(e.into()))?;
        // The query string carries the key: log the path only.
        debug!(path = url.path(), "fetching from upstream");

        let body = self.upstream.get(url).await.map_err(&fail)?;
        forward_upstream_body_verbatim(body).map_err(fail)
    }
}

/// Returns the upstream body to the client unchanged, under `200 OK`.
///
/// The body is parsed only to confirm it is JSON. The upstream status code
/// and any `error` field in the payload are not inspected: an upstream
/// rejection (unknown id, bad key) reaches the browser as a 200 carrying
/// the upstream's own error object.
pub fn forward_upstream_body_verbatim(body: Bytes) -> Result<Response, UpstreamError> {
    let parsed: Value = serde_json::from_slice(&body)?;
    match parsed.get("results").and_then(Value::as_array) {
        Some(results) => debug!(count = results.len(), "upstream returned results"),
        None => debug!("upstream returned no results array"),
    }
    Ok(Response::json(body))
}

/// Registers the four relay routes, each sharing `relay`.
pub fn routes(router: Router, relay: &Arc<Relay>) -> Router {
    router
        .get(
            "/api/search",
            with_relay(Arc::clone(relay), |r, req| async move { r.search(req).await }),
        )
        .get(
            "/api/movie/{id}",
            with_relay(Arc::clone(relay), |r, req| async move { r.movie_details(req).await }),
        )
        .get(
            "/api/movie/{id}/similar",
            with_relay(Arc::clone(relay), |r, req| async move { r.similar_movies(req).await }),
        )
        .get(
            "/api/movie/{id}/recommendations",
            with_relay(Arc::clone(relay), |r, req| async move { r.recommendations(req).await }),
        )
}

/// Binds a relay method to a shared `Arc<Relay>`, yielding a route handler.
fn with_relay<F, Fut>(relay: Arc<Relay>, f: F) -> impl Handler
where
    F: Fn(Arc<Relay>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, RelayError>> + Send + 'static,
{
    move |req| f(Arc::clone(&relay), req)
}

/// The router guarantees `id` on every `{id}` route; an empty string only
/// shows up if a route is registered without it.
fn path_id(req: &Request) -> String {
    req.param("id").unwrap_or_default().to_owned()
}
