//! Permissive CORS.
//!
//! Any origin may read any response. `OPTIONS` requests are treated as
//! preflight and answered here without reaching a route.

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_REQUEST_HEADERS, HeaderMap, HeaderValue, VARY,
};
use http::{Method, StatusCode};

use crate::response::Response;

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Answers a preflight request, or returns `None` for anything else.
///
/// Requested headers are reflected back verbatim.
pub fn preflight(method: &Method, headers: &HeaderMap) -> Option<Response> {
    if *method != Method::OPTIONS {
        return None;
    }

    let mut res = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));

    if let Some(requested) = headers.get(ACCESS_CONTROL_REQUEST_HEADERS) {
        res = res
            .header(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone())
            .header(VARY, HeaderValue::from_static("access-control-request-headers"));
    }

    Some(res.no_body())
}

/// Marks `res` readable from any origin.
pub fn allow_any_origin(res: &mut Response) {
    res.headers_mut().insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_is_not_preflight() {
        assert!(preflight(&Method::GET, &HeaderMap::new()).is_none());
    }

    #[test]
    fn preflight_reflects_requested_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_CONTROL_REQUEST_HEADERS, HeaderValue::from_static("x-requested-with"));

        let res = preflight(&Method::OPTIONS, &headers).unwrap();
        assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_HEADERS], "x-requested-with");
        assert_eq!(res.headers()[VARY], "access-control-request-headers");
        assert!(res.body_bytes().is_empty());
    }

    #[test]
    fn preflight_without_requested_headers() {
        let res = preflight(&Method::OPTIONS, &HeaderMap::new()).unwrap();
        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_HEADERS).is_none());
        assert!(res.headers().get(VARY).is_none());
    }

    #[test]
    fn any_origin() {
        let mut res = Response::text("ok");
        allow_any_origin(&mut res);
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
