//! Client that resolves operations into HTTP requests and classifies responses

use super::auth::Session;
use super::logging::{ApiLogger, OperationContext};
use super::operations::{Operation, OperationResult, Service};
use super::transport::{HttpRequest, Transport};
use crate::error::{Result, SyncError};

/// Base URLs of the two remote services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth_url: String,
    pub gateway_url: String,
}

impl Endpoints {
    pub fn new(auth_url: impl Into<String>, gateway_url: impl Into<String>) -> Self {
        Self {
            auth_url: auth_url.into(),
            gateway_url: gateway_url.into(),
        }
    }

    fn base(&self, service: Service) -> &str {
        let base = match service {
            Service::Auth => &self.auth_url,
            Service::Gateway => &self.gateway_url,
        };
        base.trim_end_matches('/')
    }
}

pub struct ApiClient {
    transport: Box<dyn Transport>,
    endpoints: Endpoints,
    logger: ApiLogger,
}

impl ApiClient {
    pub fn new(transport: Box<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
            logger: ApiLogger::default(),
        }
    }

    pub fn with_logger(mut self, logger: ApiLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Execute one operation. Authenticated operations without a session
    /// fail with [`SyncError::MissingSession`] before anything is sent.
    pub async fn execute(
        &self,
        operation: &Operation,
        session: Option<&Session>,
    ) -> Result<OperationResult> {
        let bearer = if operation.requires_session() {
            let session = session.ok_or(SyncError::MissingSession)?;
            Some(session.token().to_string())
        } else {
            None
        };

        let path = operation.path();
        let url = format!("{}{}", self.endpoints.base(operation.service()), path);
        let body = operation.body().map_err(SyncError::Encode)?;

        let ctx = OperationContext::new(
            operation.operation_type(),
            operation.http_method().as_str(),
            path,
        );
        let correlation_id = self
            .logger
            .config()
            .correlation_ids
            .then(|| ctx.correlation_id.to_string());

        let request = HttpRequest {
            method: operation.http_method(),
            url,
            bearer,
            correlation_id,
            body,
        };

        self.logger.log_request(&ctx);
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                self.logger.log_transport_error(&ctx, &e.to_string());
                return Err(e);
            }
        };
        self.logger.log_response(&ctx, response.status, &response.body);

        Ok(OperationResult::from_response(
            operation,
            response.status,
            response.body,
        ))
    }
}
