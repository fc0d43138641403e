use std::time::Duration;

use reqwest::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const ENV_BASE_URL: &str = "ORCH_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ORCH_API_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; request paths are appended verbatim.
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Reads `ORCH_API_BASE_URL` and `ORCH_API_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> ClientResult<Self> {
        let base = std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut cfg = Self::new(base);
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("{} must be whole seconds, got '{}'", ENV_TIMEOUT_SECS, raw)))?;
            if secs > 0 {
                cfg.request_timeout = Some(Duration::from_secs(secs));
            }
        }
        Ok(cfg)
    }

    /// Joins `path` onto the base URL by concatenation so a base with a path prefix is kept.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        let base = self.base_url.trim_end_matches('/');
        let full = if path.starts_with('/') { format!("{}{}", base, path) } else { format!("{}/{}", base, path) };
        Url::parse(&full).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", full, e)))
    }

    pub(crate) fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ClientError::Config(format!("unsupported scheme '{}'", other))),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
