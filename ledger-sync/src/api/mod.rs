//! Auth service and gateway API module
//!
//! Operations describe each remote call; the client resolves them into HTTP
//! requests against the right service and hands them to a transport.

pub mod auth;
pub mod client;
pub mod logging;
pub mod models;
pub mod operations;
pub mod transport;

pub use auth::{AuthClient, Session};
pub use client::{ApiClient, Endpoints};
pub use logging::{ApiLogger, MonitoringConfig};
pub use models::{Credentials, NewBudget, NewTransaction};
pub use operations::Operation;
pub use transport::ReqwestTransport;
