//! Request logging with correlation ids

use std::time::{Duration, Instant};

use log::{debug, log_enabled, trace, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monitoring and logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Attach an `X-Correlation-ID` header to every request
    pub correlation_ids: bool,
    /// Log each request and its outcome
    pub request_logging: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            correlation_ids: true,
            request_logging: true,
        }
    }
}

#[cfg(test)]
impl MonitoringConfig {
    pub fn disabled() -> Self {
        Self {
            correlation_ids: false,
            request_logging: false,
        }
    }
}

/// Tracks a single request from dispatch to response
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub correlation_id: Uuid,
    pub operation_type: &'static str,
    pub method: &'static str,
    pub path: String,
    started: Instant,
}

impl OperationContext {
    pub fn new(operation_type: &'static str, method: &'static str, path: impl Into<String>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            operation_type,
            method,
            path: path.into(),
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Writes request lifecycle events to the `log` facade
#[derive(Debug, Clone, Default)]
pub struct ApiLogger {
    config: MonitoringConfig,
}

impl ApiLogger {
    pub fn new(config: MonitoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }

    pub fn log_request(&self, ctx: &OperationContext) {
        if !self.config.request_logging {
            return;
        }
        debug!(
            "[{}] {} {} ({})",
            ctx.correlation_id, ctx.method, ctx.path, ctx.operation_type
        );
    }

    pub fn log_response(&self, ctx: &OperationContext, status: u16, body: &str) {
        if !self.config.request_logging {
            return;
        }
        debug!(
            "[{}] {} {} -> {} in {:.2}ms",
            ctx.correlation_id,
            ctx.method,
            ctx.path,
            status,
            ctx.elapsed().as_secs_f64() * 1000.0
        );
        if log_enabled!(log::Level::Trace) {
            trace!("[{}] response body: {}", ctx.correlation_id, body);
        }
    }

    pub fn log_transport_error(&self, ctx: &OperationContext, error: &str) {
        warn!(
            "[{}] {} {} failed after {:.2}ms: {}",
            ctx.correlation_id,
            ctx.method,
            ctx.path,
            ctx.elapsed().as_secs_f64() * 1000.0,
            error
        );
    }
}
