//! Client configuration.
//!
//! The browser build only has compile-time values (`STACKTRAIL_API_BASE` at
//! build time). Native builds also read the environment at run time; call
//! `dotenvy::dotenv()` before `Config::from_env()` to pick up a `.env` file.

use std::path::PathBuf;
use std::time::Duration;

/// API prefix baked in at build time, if any
const BUILD_API_BASE: Option<&str> = option_env!("STACKTRAIL_API_BASE");

/// Same-origin prefix used by the browser build
#[cfg(not(feature = "native"))]
pub const DEFAULT_API_BASE: &str = "/api";

/// Local backend used by native builds
#[cfg(feature = "native")]
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

pub const DEFAULT_SESSION_FILE: &str = ".stacktrail/session.json";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix for every backend path
    /// Example: https://checkup.example.com/api
    pub api_base: String,

    /// Where native builds persist the credential pair
    pub session_file: PathBuf,

    /// Per-request timeout for native builds
    pub request_timeout_secs: u64,
}

impl Config {
    /// Configuration from build-time values only.
    pub fn build_default() -> Self {
        Self {
            api_base: BUILD_API_BASE
                .filter(|base| !base.is_empty())
                .unwrap_or(DEFAULT_API_BASE)
                .to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables, falling back to
    /// [`build_default`](Self::build_default) for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::build_default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let request_timeout_secs = match non_empty("STACKTRAIL_REQUEST_TIMEOUT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Invalid STACKTRAIL_REQUEST_TIMEOUT '{}', using {}s",
                    raw,
                    DEFAULT_REQUEST_TIMEOUT_SECS
                );
                DEFAULT_REQUEST_TIMEOUT_SECS
            }),
            None => defaults.request_timeout_secs,
        };

        Self {
            api_base: non_empty("STACKTRAIL_API_BASE").unwrap_or(defaults.api_base),
            session_file: non_empty("STACKTRAIL_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            request_timeout_secs,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::build_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(lookup(&[]));

        assert_eq!(config, Config::build_default());
        assert_eq!(config.session_file, PathBuf::from(DEFAULT_SESSION_FILE));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("STACKTRAIL_API_BASE", "https://checkup.example.com/api"),
            ("STACKTRAIL_SESSION_FILE", "/tmp/session.json"),
            ("STACKTRAIL_REQUEST_TIMEOUT", "5"),
        ]));

        assert_eq!(config.api_base, "https://checkup.example.com/api");
        assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("STACKTRAIL_API_BASE", "  "),
            ("STACKTRAIL_SESSION_FILE", ""),
        ]));

        assert_eq!(config.api_base, Config::build_default().api_base);
        assert_eq!(config.session_file, PathBuf::from(DEFAULT_SESSION_FILE));
    }

    #[test]
    fn test_invalid_timeout_uses_default() {
        let config = Config::from_lookup(lookup(&[("STACKTRAIL_REQUEST_TIMEOUT", "soon")]));
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_default_matches_build_default() {
        assert_eq!(Config::default(), Config::build_default());
    }
}
