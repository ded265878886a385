//! Radix-tree request router.
//!
//! One `matchit` tree per HTTP method plus an optional fallback handler for
//! everything no route claims (static assets, in reelay's case).

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};

/// A matched route: the handler and its decoded path parameters.
pub(crate) type Lookup = (BoxedHandler, HashMap<String, String>);

/// The application router.
///
/// Built once at startup and handed to [`Server::serve`](crate::Server::serve).
/// Registration methods return `self` so calls chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    fallback: Option<BoxedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), fallback: None }
    }

    /// Registers `handler` for `method` + `path`.
    ///
    /// Path parameters use `{name}` syntax and are read back with
    /// [`Request::param`](crate::Request::param).
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid pattern or conflicts with a route
    /// already registered for `method`. Routes are fixed at startup, so this
    /// surfaces immediately.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Shorthand for `on(Method::GET, …)`. GET routes also answer HEAD.
    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    /// Handler for requests that match no route. Without one they get 404.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = Some(handler.into_boxed_handler());
        self
    }

    pub(crate) fn lookup(&self, method: &Method, path: &str) -> Option<Lookup> {
        self.find(method, path).or_else(|| {
            (*method == Method::HEAD).then(|| self.find(&Method::GET, path)).flatten()
        })
    }

    pub(crate) fn fallback_handler(&self) -> Option<BoxedHandler> {
        self.fallback.as_ref().map(Arc::clone)
    }

    fn find(&self, method: &Method, path: &str) -> Option<Lookup> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
