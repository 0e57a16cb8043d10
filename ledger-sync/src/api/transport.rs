//! HTTP transport seam
//!
//! Everything above this layer speaks in [`HttpRequest`]/[`HttpResponse`];
//! only [`ReqwestTransport`] touches the network.

use async_trait::async_trait;
use serde_json::Value;

use super::operations::Method;
use crate::error::{Result, SyncError};

/// Fully resolved request, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub correlation_id: Option<String>,
    pub body: Option<Value>,
}

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[cfg(test)]
impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request. Non-2xx statuses are responses, not errors; only
    /// failures to get a response at all are reported as `Err`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Production transport backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ledger-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(id) = &request.correlation_id {
            builder = builder.header("X-Correlation-ID", id);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        // A status already arrived, so the request reached the gateway
        let body = response.text().await.map_err(|e| {
            SyncError::InvalidResponse(format!("failed to read HTTP {} body: {}", status, e))
        })?;

        Ok(HttpResponse { status, body })
    }
}
