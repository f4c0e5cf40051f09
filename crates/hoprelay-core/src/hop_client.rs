//! Outbound relay call to the next hop
//!
//! Each hop is a fresh POST to `<base_url>/ping` with a bounded wait. A
//! successful body is handed back untouched; every failure collapses into a
//! single [`ForwardError`] that keeps the cause.

use std::time::Duration;

use async_trait::async_trait;
use hoprelay_common::{
    DEFAULT_FORWARD_CONNECT_TIMEOUT_MS, DEFAULT_FORWARD_TIMEOUT_SECS, ErrorBody, PING_PATH,
    REQUEST_ID_HEADER, join_url,
};
use reqwest::Client;
use tracing::debug;

use crate::model::{ForwardingOutcome, PingRequest};

/// Why a relay to the next hop failed
#[derive(thiserror::Error, Debug)]
pub enum ForwardError {
    #[error("next hop '{next_hop_id}' has no base url configured")]
    MissingAddress { next_hop_id: String },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("{url} responded with status {status}: {detail}")]
    Status {
        url: String,
        status: u16,
        detail: String,
    },

    #[error("malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ForwardError {
    fn from_reqwest(url: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForwardError::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else if err.is_connect() {
            ForwardError::Connect {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else if err.is_decode() {
            ForwardError::Decode {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            ForwardError::Request {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

/// Extract the most useful message from a failed hop's body
///
/// Hoprelay nodes answer with an [`ErrorBody`]; FastAPI-style nodes answer
/// with `{"detail": ...}`. Anything else is reported as raw text.
pub fn failure_detail(body: &[u8]) -> String {
    if let Some(error_body) = ErrorBody::parse(body) {
        return error_body.detail;
    }
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body)
        && let Some(detail) = value.get("detail").and_then(|d| d.as_str())
    {
        return detail.to_string();
    }
    String::from_utf8_lossy(body).trim().to_string()
}

/// Relays a ping to another node
#[async_trait]
pub trait HopClient: Send + Sync {
    /// Send `request` to the node at `base_url` and return its response body verbatim
    async fn forward(
        &self,
        base_url: &str,
        request: &PingRequest,
        request_id: Option<&str>,
    ) -> Result<ForwardingOutcome, ForwardError>;
}

/// Configuration for the HTTP hop client
#[derive(Clone, Debug)]
pub struct HopClientConfig {
    /// Total bounded wait for one hop
    pub timeout: Duration,
    /// Connection timeout, capped by `timeout`
    pub connect_timeout: Duration,
}

impl Default for HopClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FORWARD_TIMEOUT_SECS),
            connect_timeout: Duration::from_millis(DEFAULT_FORWARD_CONNECT_TIMEOUT_MS),
        }
    }
}

impl HopClientConfig {
    /// Set timeouts
    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }
}

/// Hop client speaking JSON over HTTP
#[derive(Clone, Debug)]
pub struct HttpHopClient {
    client: Client,
    config: HopClientConfig,
}

impl HttpHopClient {
    pub fn new(config: HopClientConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout.min(config.timeout))
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl HopClient for HttpHopClient {
    async fn forward(
        &self,
        base_url: &str,
        request: &PingRequest,
        request_id: Option<&str>,
    ) -> Result<ForwardingOutcome, ForwardError> {
        let url = join_url(base_url, PING_PATH);
        let timeout = self.config.timeout;

        let mut builder = self.client.post(&url).json(request);
        if let Some(request_id) = request_id {
            builder = builder.header(REQUEST_ID_HEADER, request_id);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ForwardError::from_reqwest(&url, timeout, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ForwardError::from_reqwest(&url, timeout, e))?;

        debug!(url = %url, status = status.as_u16(), len = body.len(), "next hop responded");

        if !status.is_success() {
            return Err(ForwardError::Status {
                url,
                status: status.as_u16(),
                detail: failure_detail(&body),
            });
        }

        serde_json::from_slice(&body).map_err(|e| ForwardError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}
