//! Client configuration

use std::time::Duration;

use kindview_core::{KindviewError, Result};
use url::Url;

/// Bounded wait for every remote call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

/// Service root used when nothing else is configured
pub const DEFAULT_ROOT: &str = "http://localhost:8080/db";

/// Response header naming the login page on a 403
pub const LOGIN_URL_HEADER: &str = "X-Login-URL";

/// Request header naming where the login page should send the user back to
pub const RETURN_URL_HEADER: &str = "X-Login-Return-Url";

/// Where and how to reach the store service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    root: Url,
    pub timeout: Duration,
    /// Sent as [`RETURN_URL_HEADER`] on every request when set
    pub return_url: Option<String>,
}

impl ClientConfig {
    /// Configuration for the service rooted at `root`, e.g. `http://host/db`
    pub fn new(root: &str) -> Result<Self> {
        let root = Url::parse(root)
            .map_err(|e| KindviewError::Configuration(format!("invalid root URL {}: {}", root, e)))?;
        if root.cannot_be_a_base() {
            return Err(KindviewError::Configuration(format!(
                "root URL cannot carry paths: {}",
                root
            )));
        }
        Ok(Self {
            root,
            timeout: DEFAULT_TIMEOUT,
            return_url: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_return_url(mut self, return_url: impl Into<String>) -> Self {
        self.return_url = Some(return_url.into());
        self
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// `<root>/<path>`, regardless of a trailing slash on the root
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.root.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            root: Url::parse(DEFAULT_ROOT).expect("valid default root"),
            timeout: DEFAULT_TIMEOUT,
            return_url: None,
        }
    }
}
