//! Client configuration
//!
//! Explicit values win over the environment; the API key is the only
//! setting without a default and its absence fails construction.

use std::fmt;
use std::time::Duration;

use crate::error::{Result, ToolError};

pub const DEFAULT_BASE_URL: &str = "https://api.tokenmetrics.com/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

pub const API_KEY_ENV: &str = "TMAI_API_KEY";
pub const BASE_URL_ENV: &str = "TMAI_BASE_URL";
pub const TIMEOUT_ENV: &str = "TMAI_TIMEOUT_SECS";
pub const MAX_PAGES_ENV: &str = "TMAI_MAX_PAGES";

/// Caller-supplied settings; anything left `None` is looked up in the
/// environment or defaulted by [`ClientConfig::resolve`].
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub max_pages: Option<usize>,
    pub preview_rows: Option<usize>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_pages", &self.max_pages)
            .field("preview_rows", &self.preview_rows)
            .finish()
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    #[must_use]
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Resolve against the process environment
    pub fn resolve(self) -> Result<ClientSettings> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary variable lookup
    pub fn resolve_with<F>(self, env: F) -> Result<ClientSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_blank(self.api_key)
            .or_else(|| lookup(API_KEY_ENV))
            .ok_or_else(|| {
                ToolError::config(format!(
                    "no API key provided; pass one explicitly or set {API_KEY_ENV}"
                ))
            })?;

        let base_url = non_blank(self.base_url)
            .or_else(|| lookup(BASE_URL_ENV))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = normalize_base_url(&base_url)?;

        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => match lookup(TIMEOUT_ENV) {
                Some(raw) => Duration::from_secs(parse_positive(TIMEOUT_ENV, &raw)?),
                None => DEFAULT_TIMEOUT,
            },
        };
        if timeout.is_zero() {
            return Err(ToolError::config("timeout must be greater than zero"));
        }

        let max_pages = match self.max_pages {
            Some(pages) => pages,
            None => match lookup(MAX_PAGES_ENV) {
                Some(raw) => usize::try_from(parse_positive(MAX_PAGES_ENV, &raw)?)
                    .map_err(|_| ToolError::config(format!("{MAX_PAGES_ENV} is out of range")))?,
                None => DEFAULT_MAX_PAGES,
            },
        };
        if max_pages == 0 {
            return Err(ToolError::config("max_pages must be at least 1"));
        }

        Ok(ClientSettings {
            api_key,
            base_url,
            timeout,
            max_pages,
            preview_rows: self.preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
        })
    }
}

/// Fully resolved settings shared by every tool of a client
#[derive(Clone)]
pub struct ClientSettings {
    api_key: String,
    base_url: String,
    timeout: Duration,
    max_pages: usize,
    preview_rows: usize,
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_pages", &self.max_pages)
            .field("preview_rows", &self.preview_rows)
            .finish()
    }
}

impl ClientSettings {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Upper bound on requests for one paginated invocation
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Rows rendered in a result summary
    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let url = reqwest::Url::parse(raw)
        .map_err(|e| ToolError::config(format!("invalid base URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ToolError::config(format!(
            "base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_positive(name: &str, raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ToolError::config(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = ClientConfig::new().resolve_with(env(&[])).unwrap_err();
        assert!(matches!(err, ToolError::Config(_)));
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let err = ClientConfig::new()
            .with_api_key("   ")
            .resolve_with(env(&[(API_KEY_ENV, "")]))
            .unwrap_err();
        assert!(matches!(err, ToolError::Config(_)));
    }

    #[test]
    fn test_explicit_key_beats_environment() {
        let settings = ClientConfig::new()
            .with_api_key("explicit")
            .resolve_with(env(&[(API_KEY_ENV, "from-env")]))
            .unwrap();
        assert_eq!(settings.api_key(), "explicit");
    }

    #[test]
    fn test_environment_key_and_defaults() {
        let settings = ClientConfig::new()
            .resolve_with(env(&[(API_KEY_ENV, "from-env")]))
            .unwrap();
        assert_eq!(settings.api_key(), "from-env");
        assert_eq!(settings.base_url(), DEFAULT_BASE_URL);
        assert_eq!(settings.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(settings.max_pages(), DEFAULT_MAX_PAGES);
    }

    #[test]
    fn test_base_url_override_and_trailing_slash() {
        let settings = ClientConfig::new()
            .resolve_with(env(&[
                (API_KEY_ENV, "k"),
                (BASE_URL_ENV, "http://localhost:8080/v2/"),
                (TIMEOUT_ENV, "5"),
                (MAX_PAGES_ENV, "3"),
            ]))
            .unwrap();
        assert_eq!(settings.base_url(), "http://localhost:8080/v2");
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.max_pages(), 3);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let bad_url = ClientConfig::new()
            .with_api_key("k")
            .with_base_url("not a url")
            .resolve_with(env(&[]));
        assert!(matches!(bad_url, Err(ToolError::Config(_))));

        let bad_timeout = ClientConfig::new()
            .with_api_key("k")
            .resolve_with(env(&[(TIMEOUT_ENV, "soon")]));
        assert!(matches!(bad_timeout, Err(ToolError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ClientConfig::new().with_api_key("secret-key");
        assert!(!format!("{config:?}").contains("secret-key"));

        let settings = config.resolve_with(env(&[])).unwrap();
        assert!(!format!("{settings:?}").contains("secret-key"));
    }
}
