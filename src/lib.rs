//! # reelay
//!
//! A minimal HTTP relay in front of the TMDB movie metadata API.
//!
//! The browser never sees the API key. It calls reelay; reelay adds the key
//! held in its environment, makes one upstream GET, and returns the upstream
//! JSON unmodified.
//!
//! | Route | Forwards to |
//! |---|---|
//! | `GET /api/search?query=…` | `/search/movie` |
//! | `GET /api/movie/{id}` | `/movie/{id}?append_to_response=credits` |
//! | `GET /api/movie/{id}/similar` | `/movie/{id}/similar` |
//! | `GET /api/movie/{id}/recommendations` | `/movie/{id}/recommendations` |
//!
//! Anything else is served from the static asset directory. `/healthz` and
//! `/readyz` answer health probes.
//!
//! Errors the relay produces itself are `{"error": "..."}`: 400 when no key
//! is configured, 500 when the upstream could not be reached or did not
//! answer with JSON. Upstream error payloads are relayed as-is under 200.
//!
//! ## Running
//!
//! ```rust,no_run
//! use reelay::{Config, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), reelay::Error> {
//!     let config = Config::from_env()?;
//!     let app = reelay::app(&config)?;
//!     Server::bind(config.listen).serve(app).await
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod health;
pub mod middleware;
pub mod relay;
pub mod static_files;
pub mod upstream;

use std::sync::Arc;

pub use config::{Config, Credential};
pub use error::{Error, RelayError, UpstreamError};
pub use handler::Handler;
pub use relay::Relay;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::{Server, serve_listener};
pub use static_files::StaticFiles;
pub use upstream::{Endpoint, HttpUpstream, Upstream};

/// Builds the full application router from `config`, using the production
/// `reqwest` client for upstream calls.
pub fn app(config: &Config) -> Result<Router, Error> {
    let upstream = HttpUpstream::new(config.upstream_timeout)?;
    Ok(app_with_upstream(config, Arc::new(upstream)))
}

/// Same as [`app`] with a caller-supplied upstream.
pub fn app_with_upstream(config: &Config, upstream: Arc<dyn Upstream>) -> Router {
    let relay = Arc::new(Relay::new(config, upstream));
    let router = Router::new()
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness(Arc::clone(&relay)))
        .fallback(StaticFiles::new(config.static_dir.clone()).into_handler());
    relay::routes(router, &relay)
}
