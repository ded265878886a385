//! Handler trait and type erasure.
//!
//! Routes hold handlers of different concrete types in one table, so each
//! handler is boxed behind `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! |req| async move { relay.search(req).await }   ← closure registered on a route
//!        ↓ Router::get("/api/search", …)
//! handler.into_boxed_handler()                   ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(closure))                   ← stored as BoxedHandler
//!        ↓ per request
//! Box::pin(async { fut.await.into_response() })  ← BoxFuture
//! ```
//!
//! Per request that is one `Arc` clone and one virtual call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A boxed future resolving to a [`Response`]. `Send + 'static` so tokio can
/// move it between worker threads.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Object-safe dispatch interface behind every registered handler.
///
/// `#[doc(hidden)] pub` because it appears in [`Handler::into_boxed_handler`].
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// Satisfied automatically by any function or closure shaped like
///
/// ```text
/// Fn(Request) -> impl Future<Output = impl IntoResponse>
/// ```
///
/// that is `Send + Sync + 'static`. Closures may capture shared state, which
/// is how the relay hands its configuration to each route. The trait is
/// sealed; the blanket impl is the only one.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use super::*;

    #[tokio::test]
    async fn closure_with_captured_state() {
        let greeting = Arc::new(String::from("hello"));
        let handler = {
            let greeting = Arc::clone(&greeting);
            move |_req: Request| {
                let greeting = Arc::clone(&greeting);
                async move { greeting.as_str().to_owned() }
            }
        };

        let boxed = handler.into_boxed_handler();
        let res = boxed.call(Request::for_test(Method::GET, "/", &[])).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body_bytes().as_ref(), b"hello");
    }

    #[tokio::test]
    async fn status_return_type() {
        async fn teapot(_req: Request) -> StatusCode {
            StatusCode::IM_A_TEAPOT
        }
        let res = teapot.into_boxed_handler().call(Request::for_test(Method::GET, "/", &[])).await;
        assert_eq!(res.status_code(), StatusCode::IM_A_TEAPOT);
    }
}
