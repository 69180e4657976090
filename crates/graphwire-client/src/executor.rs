//! HTTP request execution: URL building, timeouts, status handling and
//! envelope unwrapping.

use std::time::Duration;

use graphwire_core::{Error, Result, unwrap_envelope};
use reqwest::{StatusCode, Url, header};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;

/// Issues GET requests against the configured service.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: reqwest::Client,
    base_url: Url,
    api_prefix: Vec<String>,
    timeout: Duration,
}

impl RequestExecutor {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(config.base_url.clone()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_prefix: config.api_prefix_segments(),
            timeout: config.timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `base / api_prefix / segments ? query`. Segments are percent-encoded,
    /// so ids may contain `/` or spaces.
    pub fn url(&self, segments: &[&str], query: &[(&'static str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(self.api_prefix.iter().map(String::as_str));
            path.extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(name, value)| (*name, value.as_str())));
        }
        Ok(url)
    }

    /// GET a resource and return its unwrapped payload.
    ///
    /// `204 No Content` yields `Value::Null`. If nothing arrives within the
    /// configured timeout the in-flight request is dropped and
    /// [`Error::Timeout`] is returned.
    pub async fn get(&self, segments: &[&str], query: &[(&'static str, String)]) -> Result<Value> {
        let url = self.url(segments, query)?;
        debug!("GET {}", url);

        match tokio::time::timeout(self.timeout, self.fetch(url.clone())).await {
            Ok(result) => result,
            Err(_) => {
                warn!("GET {} timed out after {:?}", url, self.timeout);
                Err(Error::Timeout(self.timeout))
            }
        }
    }

    async fn fetch(&self, url: Url) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if !status.is_success() {
            debug!("Request failed with {}: {}", status, body);
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = serde_json::from_str(&body)?;
        unwrap_envelope(payload)
    }
}
