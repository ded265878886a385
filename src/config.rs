//! Process configuration, read once from the environment at startup.
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `3001` |
//! | `HOST` | `0.0.0.0` |
//! | `TMDB_API_KEY` | unset |
//! | `TMDB_BASE_URL` | `https://api.themoviedb.org/3` |
//! | `STATIC_DIR` | `public` |
//! | `UPSTREAM_TIMEOUT_SECS` | unset (no timeout) |
//!
//! A missing `TMDB_API_KEY` is not a startup error. The server still starts
//! and each relay route answers 400 until the key is supplied.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::Error;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_STATIC_DIR: &str = "public";

/// The upstream API key.
///
/// Never empty. `Debug` prints a placeholder so the key cannot leak through
/// a stray `{:?}` in a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty (or all-whitespace) value, which counts
    /// as "not configured".
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() { None } else { Some(Self(value)) }
    }

    pub fn expose(&self) -> &str { &self.0 }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Immutable runtime configuration, shared by every request.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen: SocketAddr,
    pub credential: Option<Credential>,
    /// Upstream API root, without a trailing slash.
    pub upstream_base: Url,
    pub static_dir: PathBuf,
    /// Whole-request timeout for upstream calls. `None` waits forever.
    pub upstream_timeout: Option<Duration>,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset and unreadable keys are
    /// both `None`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let port = match lookup("PORT").filter(|v| !v.is_empty()) {
            Some(v) => v
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("PORT `{v}`: {e}")))?,
            None => DEFAULT_PORT,
        };

        let host = match lookup("HOST").filter(|v| !v.is_empty()) {
            Some(v) => v
                .parse::<IpAddr>()
                .map_err(|e| Error::Config(format!("HOST `{v}`: {e}")))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let base = lookup("TMDB_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let upstream_base = Url::parse(base.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("TMDB_BASE_URL `{base}`: {e}")))?;
        if upstream_base.cannot_be_a_base() {
            return Err(Error::Config(format!("TMDB_BASE_URL `{base}` is not a base url")));
        }

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS").filter(|v| !v.is_empty()) {
            Some(v) => {
                let secs = v
                    .parse::<u64>()
                    .map_err(|e| Error::Config(format!("UPSTREAM_TIMEOUT_SECS `{v}`: {e}")))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            listen: SocketAddr::new(host, port),
            credential: lookup("TMDB_API_KEY").and_then(Credential::new),
            upstream_base,
            static_dir: lookup("STATIC_DIR")
                .filter(|v| !v.is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
            upstream_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.listen, "0.0.0.0:3001".parse().unwrap());
        assert!(cfg.credential.is_none());
        assert_eq!(cfg.upstream_base.as_str(), "https://api.themoviedb.org/3");
        assert_eq!(cfg.static_dir, PathBuf::from("public"));
        assert!(cfg.upstream_timeout.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("TMDB_API_KEY", "X123"),
            ("TMDB_BASE_URL", "http://localhost:9000/3/"),
            ("STATIC_DIR", "/srv/www"),
            ("UPSTREAM_TIMEOUT_SECS", "10"),
        ])
        .unwrap();
        assert_eq!(cfg.listen, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cfg.credential.as_ref().map(Credential::expose), Some("X123"));
        assert_eq!(cfg.upstream_base.as_str(), "http://localhost:9000/3");
        assert_eq!(cfg.static_dir, PathBuf::from("/srv/www"));
        assert_eq!(cfg.upstream_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn empty_key_counts_as_unset() {
        assert!(config(&[("TMDB_API_KEY", "")]).unwrap().credential.is_none());
        assert!(config(&[("TMDB_API_KEY", "   ")]).unwrap().credential.is_none());
    }

    #[test]
    fn zero_timeout_disables_it() {
        let cfg = config(&[("UPSTREAM_TIMEOUT_SECS", "0")]).unwrap();
        assert!(cfg.upstream_timeout.is_none());
    }

    #[test]
    fn malformed_values_fail() {
        assert!(matches!(config(&[("PORT", "http")]), Err(Error::Config(_))));
        assert!(matches!(config(&[("PORT", "70000")]), Err(Error::Config(_))));
        assert!(matches!(config(&[("HOST", "localhost:1")]), Err(Error::Config(_))));
        assert!(matches!(config(&[("TMDB_BASE_URL", "not a url")]), Err(Error::Config(_))));
        assert!(matches!(config(&[("TMDB_BASE_URL", "mailto:x@y")]), Err(Error::Config(_))));
        assert!(matches!(config(&[("UPSTREAM_TIMEOUT_SECS", "-1")]), Err(Error::Config(_))));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::new("super-secret").unwrap();
        let cfg = config(&[("TMDB_API_KEY", "super-secret")]).unwrap();
        assert!(!format!("{cred:?}").contains("super-secret"));
        assert!(!format!("{cfg:?}").contains("super-secret"));
    }
}
