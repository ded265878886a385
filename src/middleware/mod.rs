//! Middleware layer.
//!
//! Cross-cutting concerns applied by the server around every dispatch:
//!
//! - [`cors`]: answers preflight requests and opens every response to any
//!   origin, so the browser front-end can call the relay from anywhere.
//! - [`trace`]: one log line per request with method, path, status and latency.

pub mod cors;
pub mod trace;
