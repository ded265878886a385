//! Static assets served from a local directory at the web root.
//!
//! Used as the router fallback: anything no API route claims is looked up
//! under the asset root. `/` and directories map to their `index.html`.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use http::header::HeaderValue;
use http::{Method, StatusCode};
use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;

/// A directory of files served read-only.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Wraps `self` as a router fallback handler.
    pub fn into_handler(self) -> impl Handler {
        let files = Arc::new(self);
        move |req: Request| {
            let files = Arc::clone(&files);
            async move { files.serve(&req).await }
        }
    }

    /// Serves the file `req` names, or 404.
    pub async fn serve(&self, req: &Request) -> Response {
        if *req.method() != Method::GET && *req.method() != Method::HEAD {
            return Response::status(StatusCode::NOT_FOUND);
        }

        let Some(mut path) = self.resolve(req.path()) else {
            debug!(path = req.path(), "rejected static path");
            return Response::status(StatusCode::NOT_FOUND);
        };

        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            path.push("index.html");
        }

        match tokio::fs::read(&path).await {
            Ok(contents) => {
                let mime = mime_guess::from_path(&path).first_or_octet_stream();
                let content_type = HeaderValue::from_str(mime.as_ref())
                    .unwrap_or(HeaderValue::from_static("application/octet-stream"));
                Response::builder().body(content_type, contents)
            }
            Err(e) => {
                debug!(path = %path.display(), "static file unavailable: {e}");
                Response::status(StatusCode::NOT_FOUND)
            }
        }
    }

    /// Maps a request path onto the asset root.
    ///
    /// Returns `None` for anything that could escape the root: `..`,
    /// absolute or prefixed components, backslashes, NUL bytes, or invalid
    /// UTF-8 after decoding.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
        if decoded.contains('\0') || decoded.contains('\\') {
            return None;
        }

        let mut path = self.root.clone();
        for component in Path::new(decoded.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(path)
    }
}
