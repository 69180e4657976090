//! Resolved client configuration.
//!
//! These are plain values. Sourcing them from flags, env or files is the
//! embedding application's job.

use std::time::Duration;

use graphwire_core::{Error, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:4000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_WS_PATH: &str = "/ws";
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(5000);

/// HTTP side of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme, host and optional path of the service, e.g. `http://localhost:4000`.
    pub base_url: String,
    /// Prefix placed between the base URL and every resource path.
    pub api_prefix: String,
    /// Upper bound for a single request, connect to last body byte.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Push-event side of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Socket path relative to the base URL (not the API prefix).
    pub path: String,
    /// Offered `Sec-WebSocket-Protocol` values, empty for none.
    pub protocols: Vec<String>,
    /// Fixed pause between a disconnect and the next attempt.
    pub retry_delay: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_WS_PATH.to_string(),
            protocols: Vec::new(),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl ClientConfig {
    pub fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }

    /// Non-empty segments of the API prefix.
    pub fn api_prefix_segments(&self) -> Vec<String> {
        split_segments(&self.api_prefix)
    }

    /// Socket URL for `stream`: `http` becomes `ws`, `https` becomes `wss`.
    pub fn ws_url(&self, stream: &StreamConfig) -> Result<Url> {
        let mut url = self.parsed_base_url()?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => return Err(Error::InvalidUrl(format!("unsupported scheme `{}`", other))),
        };
        url.set_scheme(scheme)
            .map_err(|_| Error::InvalidUrl(format!("cannot switch {} to {}", self.base_url, scheme)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::InvalidUrl(self.base_url.clone()))?;
            path.pop_if_empty();
            path.extend(split_segments(&stream.path));
        }
        url.set_query(None);
        Ok(url)
    }
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
