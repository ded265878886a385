//! Incoming HTTP request type.

use std::collections::HashMap;

use http::{Method, Uri};

/// An incoming HTTP request, as seen by a handler.
///
/// Only the head is kept. Every relayed route is a `GET`, so the body is
/// never read.
pub struct Request {
    method: Method,
    uri: Uri,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(parts: http::request::Parts, params: HashMap<String, String>) -> Self {
        Self { method: parts.method, uri: parts.uri, params }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { self.uri.path() }

    /// Returns a named path parameter, exactly as it appeared on the wire.
    ///
    /// For a route `/api/movie/{id}`, `req.param("id")` on `/api/movie/27205`
    /// returns `Some("27205")`. Percent-escapes are not decoded.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first decoded value of query parameter `key`.
    ///
    /// Decoding follows `application/x-www-form-urlencoded`: `+` is a space
    /// and percent-escapes are resolved. `?query=The+Dark%20Knight` yields
    /// `"The Dark Knight"`.
    pub fn query(&self, key: &str) -> Option<String> {
        let raw = self.uri.query()?;
        url::form_urlencoded::parse(raw.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

#[cfg(test)]
impl Request {
    /// Builds a request without going through the server.
    pub(crate) fn for_test(method: Method, uri: &str, params: &[(&str, &str)]) -> Self {
        let (parts, ()) = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .expect("valid test request")
            .into_parts();
        let params = params.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        Self::new(parts, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_decodes_form_encoding() {
        let req = Request::for_test(Method::GET, "/api/search?query=The+Dark%20Knight", &[]);
        assert_eq!(req.query("query").as_deref(), Some("The Dark Knight"));
    }

    #[test]
    fn query_keeps_reserved_characters() {
        let req = Request::for_test(Method::GET, "/api/search?query=a%26b%3Dc&page=2", &[]);
        assert_eq!(req.query("query").as_deref(), Some("a&b=c"));
        assert_eq!(req.query("page").as_deref(), Some("2"));
    }

    #[test]
    fn query_first_value_wins() {
        let req = Request::for_test(Method::GET, "/api/search?query=one&query=two", &[]);
        assert_eq!(req.query("query").as_deref(), Some("one"));
    }

    #[test]
    fn query_missing() {
        let req = Request::for_test(Method::GET, "/api/search", &[]);
        assert_eq!(req.query("query"), None);
    }

    #[test]
    fn param_is_not_decoded() {
        let req = Request::for_test(Method::GET, "/api/movie/a%20b", &[("id", "a%20b")]);
        assert_eq!(req.param("id"), Some("a%20b"));
        assert_eq!(req.path(), "/api/movie/a%20b");
    }
}
