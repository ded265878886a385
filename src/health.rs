//! Health-check handlers.
//!
//! | Probe | Path | Answer |
//! |---|---|---|
//! | **Liveness** | `/healthz` | `200 ok` whenever the process can answer HTTP |
//! | **Readiness** | `/readyz` | `200 ready` once `TMDB_API_KEY` is configured, `503` before |
//!
//! A missing key never stops the relay routes from answering (they reply
//! 400), so readiness is the only place the condition is visible to an
//! orchestrator.

use std::sync::Arc;

use http::StatusCode;

use crate::error::MISSING_CREDENTIAL;
use crate::handler::Handler;
use crate::relay::Relay;
use crate::{Request, Response};

/// Liveness probe. No dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe bound to `relay`'s configuration.
pub fn readiness(relay: Arc<Relay>) -> impl Handler {
    move |_req: Request| {
        let ready = relay.has_credential();
        async move {
            if ready {
                Response::text("ready")
            } else {
                Response::error_json(StatusCode::SERVICE_UNAVAILABLE, MISSING_CREDENTIAL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bytes::Bytes;
    use http::Method;
    use url::Url;

    use super::*;
    use crate::config::Config;
    use crate::error::UpstreamError;
    use crate::upstream::Upstream;

    struct Unused;

    #[async_trait]
    impl Upstream for Unused {
        async fn get(&self, _url: Url) -> Result<Bytes, UpstreamError> {
            unreachable!("health probes never call upstream")
        }
    }

    fn relay(key: Option<&'static str>) -> Arc<Relay> {
        let config = Config::from_lookup(|k| (k == "TMDB_API_KEY").then(|| key).flatten().map(str::to_owned))
            .unwrap();
        Arc::new(Relay::new(&config, Arc::new(Unused)))
    }

    fn probe() -> Request {
        Request::for_test(Method::GET, "/", &[])
    }

    #[tokio::test]
    async fn liveness_is_unconditional() {
        let res = liveness(probe()).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body_bytes().as_ref(), b"ok");
    }

    #[tokio::test]
    async fn readiness_follows_credential() {
        let ready = readiness(relay(Some("X123"))).into_boxed_handler().call(probe()).await;
        assert_eq!(ready.status_code(), StatusCode::OK);

        let waiting = readiness(relay(None)).into_boxed_handler().call(probe()).await;
        assert_eq!(waiting.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(waiting.body_bytes().as_ref(), br#"{"error":"API key not set in .env file"}"#);
    }
}
