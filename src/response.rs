//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers build a [`Response`] (or anything that converts into one) and
//! return it. The server turns it into a hyper response at the very end.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// Wire shape of every error reelay produces itself: `{"error": "..."}`.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use reelay::Response;
/// use http::StatusCode;
///
/// Response::json(br#"{"page":1}"#.to_vec());
/// Response::text("ok");
/// Response::status(StatusCode::NO_CONTENT);
/// Response::error_json(StatusCode::BAD_REQUEST, "missing id");
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// `200 OK` with `application/json`. The bytes are sent exactly as given.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::with_type(JSON, body.into())
    }

    /// `200 OK` with `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_type(TEXT, Bytes::from(body.into()))
    }

    /// Response with no body.
    pub fn status(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// `{"error": message}` with the given status.
    pub fn error_json(status: StatusCode, message: &str) -> Self {
        match serde_json::to_vec(&ErrorBody { error: message }) {
            Ok(body) => Self::builder().status(status).json(body),
            Err(_) => Self::status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { status: StatusCode::OK, headers: HeaderMap::new() }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
    pub fn body_bytes(&self) -> &Bytes { &self.body }

    fn with_type(content_type: &'static str, body: Bytes) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self { status: StatusCode::OK, headers, body }
    }

    /// Converts into the hyper-facing response. Called once per request by
    /// the server.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`]. Defaults to `200 OK`.
///
/// Terminated by a typed body method, so the content type is always set
/// alongside the body.
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
}

impl ResponseBuilder {
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Appends a header. Repeated names are kept, not replaced.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn json(self, body: impl Into<Bytes>) -> Response {
        self.body(HeaderValue::from_static(JSON), body)
    }

    pub fn text(self, body: impl Into<String>) -> Response {
        self.body(HeaderValue::from_static(TEXT), Bytes::from(body.into()))
    }

    /// Terminate with an arbitrary content type.
    pub fn body(mut self, content_type: HeaderValue, body: impl Into<Bytes>) -> Response {
        self.headers.insert(CONTENT_TYPE, content_type);
        Response { status: self.status, headers: self.headers, body: body.into() }
    }

    /// Terminate with no body (`204`, preflight answers, etc.).
    pub fn no_body(self) -> Response {
        Response { status: self.status, headers: self.headers, body: Bytes::new() }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implemented for the handful of types handlers actually return. The
/// `Result` impl lets a handler use `?` with any error that converts into a
/// response, such as [`RelayError`](crate::RelayError).
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: IntoResponse,
{
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_bytes_untouched() {
        let body = br#"{ "page" : 1 ,"results":[] }"#;
        let res = Response::json(body.to_vec());
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(res.body_bytes().as_ref(), body);
    }

    #[test]
    fn error_json_escapes_message() {
        let res = Response::error_json(StatusCode::BAD_REQUEST, r#"bad "id""#);
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(res.body_bytes().as_ref(), br#"{"error":"bad \"id\""}"#);
    }

    #[test]
    fn builder_appends_headers() {
        let res = Response::builder()
            .status(StatusCode::CREATED)
            .header(http::header::VARY, HeaderValue::from_static("origin"))
            .header(http::header::VARY, HeaderValue::from_static("accept"))
            .text("made");
        assert_eq!(res.status_code(), StatusCode::CREATED);
        assert_eq!(res.headers().get_all(http::header::VARY).iter().count(), 2);
        assert_eq!(res.headers()[CONTENT_TYPE], TEXT);
    }

    #[test]
    fn result_converts_either_side() {
        let ok: Result<&'static str, StatusCode> = Ok("fine");
        assert_eq!(ok.into_response().status_code(), StatusCode::OK);

        let err: Result<&'static str, StatusCode> = Err(StatusCode::BAD_GATEWAY);
        assert_eq!(err.into_response().status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn into_inner_carries_status_and_headers() {
        let res = Response::error_json(StatusCode::NOT_FOUND, "nope").into_inner();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
    }
}
