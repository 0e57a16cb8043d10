//! Core Operation types for auth and gateway calls

use chrono::NaiveDate;
use serde_json::Value;

use crate::api::models::{Credentials, NewBudget, NewTransaction};

/// Which remote service an operation is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Auth,
    Gateway,
}

/// HTTP verb used by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A single call that can be executed against the auth service or gateway
#[derive(Debug, Clone)]
pub enum Operation {
    /// Create an account
    Register { credentials: Credentials },
    /// Exchange credentials for a bearer token
    Login { credentials: Credentials },
    /// Create one transaction
    CreateTransaction { transaction: NewTransaction },
    /// Create or replace one budget
    CreateBudget { budget: NewBudget },
    /// Import many transactions in one request
    /// POST /api/transactions/bulk?workers=<hint>
    BulkImportTransactions {
        transactions: Vec<NewTransaction>,
        /// Server-side worker concurrency hint, passed through untouched
        workers: u32,
    },
    /// Category totals for a date range
    /// GET /api/reports/summary?from=<date>&to=<date>
    ReportSummary { from: NaiveDate, to: NaiveDate },
    ListTransactions,
    ListBudgets,
    /// Gateway health check
    Ping,
}

/// Result of executing an Operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    /// Whether the status matched what the operation expects on success
    pub success: bool,
    /// HTTP status code from the response
    pub status_code: u16,
    /// Raw response body; on failure this is the reason shown to the user
    pub body: String,
}

impl Operation {
    pub fn service(&self) -> Service {
        match self {
            Self::Register { .. } | Self::Login { .. } => Service::Auth,
            _ => Service::Gateway,
        }
    }

    /// Get the HTTP method for this operation
    pub fn http_method(&self) -> Method {
        match self {
            Self::ReportSummary { .. } | Self::ListTransactions | Self::ListBudgets | Self::Ping => {
                Method::Get
            }
            _ => Method::Post,
        }
    }

    /// Path and query relative to the service base URL
    pub fn path(&self) -> String {
        match self {
            Self::Register { .. } => "/auth/register".to_string(),
            Self::Login { .. } => "/auth/login".to_string(),
            Self::CreateTransaction { .. } | Self::ListTransactions => {
                "/api/transactions".to_string()
            }
            Self::CreateBudget { .. } | Self::ListBudgets => "/api/budgets".to_string(),
            Self::BulkImportTransactions { workers, .. } => {
                format!("/api/transactions/bulk?workers={}", workers)
            }
            Self::ReportSummary { from, to } => format!(
                "/api/reports/summary?from={}&to={}",
                urlencoding::encode(&from.format("%Y-%m-%d").to_string()),
                urlencoding::encode(&to.format("%Y-%m-%d").to_string()),
            ),
            Self::Ping => "/ping".to_string(),
        }
    }

    /// JSON request body, if the operation sends one
    pub fn body(&self) -> serde_json::Result<Option<Value>> {
        let body = match self {
            Self::Register { credentials } | Self::Login { credentials } => {
                serde_json::to_value(credentials)?
            }
            Self::CreateTransaction { transaction } => serde_json::to_value(transaction)?,
            Self::CreateBudget { budget } => serde_json::to_value(budget)?,
            Self::BulkImportTransactions { transactions, .. } => {
                serde_json::to_value(transactions)?
            }
            Self::ReportSummary { .. } | Self::ListTransactions | Self::ListBudgets | Self::Ping => {
                return Ok(None);
            }
        };
        Ok(Some(body))
    }

    /// Whether a bearer token must accompany the request
    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Register { .. } | Self::Login { .. } | Self::Ping)
    }

    /// Status codes that count as success for this operation
    pub fn success_statuses(&self) -> &'static [u16] {
        match self {
            Self::Register { .. } => &[200, 201],
            Self::CreateTransaction { .. } | Self::CreateBudget { .. } => &[201],
            _ => &[200],
        }
    }

    /// Get the operation type as a string
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Login { .. } => "login",
            Self::CreateTransaction { .. } => "create_transaction",
            Self::CreateBudget { .. } => "create_budget",
            Self::BulkImportTransactions { .. } => "bulk_import_transactions",
            Self::ReportSummary { .. } => "report_summary",
            Self::ListTransactions => "list_transactions",
            Self::ListBudgets => "list_budgets",
            Self::Ping => "ping",
        }
    }
}

impl OperationResult {
    /// Classify a raw response against what the operation expects
    pub fn from_response(operation: &Operation, status_code: u16, body: String) -> Self {
        Self {
            success: operation.success_statuses().contains(&status_code),
            status_code,
            body,
        }
    }

    /// Check if this result represents a successful operation
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Check if this result represents a failed operation
    pub fn is_error(&self) -> bool {
        !self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx() -> NewTransaction {
        NewTransaction {
            amount: 10.0,
            category: "food".to_string(),
            description: "lunch".to_string(),
            date: "2025-01-01".to_string(),
        }
    }

    #[test]
    fn test_paths() {
        let op = Operation::BulkImportTransactions {
            transactions: vec![tx()],
            workers: 8,
        };
        assert_eq!(op.path(), "/api/transactions/bulk?workers=8");
        assert_eq!(op.http_method(), Method::Post);

        let op = Operation::ReportSummary {
            from: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        };
        assert_eq!(
            op.path(),
            "/api/reports/summary?from=2025-12-01&to=2025-12-31"
        );
        assert_eq!(op.http_method(), Method::Get);
    }

    #[test]
    fn test_services_and_sessions() {
        let login = Operation::Login {
            credentials: Credentials::new("a@b.c", "pw"),
        };
        assert_eq!(login.service(), Service::Auth);
        assert!(!login.requires_session());
        assert!(!Operation::Ping.requires_session());

        let create = Operation::CreateTransaction { transaction: tx() };
        assert_eq!(create.service(), Service::Gateway);
        assert!(create.requires_session());
    }

    #[test]
    fn test_bulk_body_is_array() {
        let op = Operation::BulkImportTransactions {
            transactions: vec![tx(), tx()],
            workers: 4,
        };
        let body = op.body().unwrap().unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["category"], json!("food"));
        assert!(Operation::Ping.body().unwrap().is_none());
    }

    #[test]
    fn test_success_statuses() {
        let register = Operation::Register {
            credentials: Credentials::new("a@b.c", "pw"),
        };
        assert!(OperationResult::from_response(&register, 200, String::new()).is_success());
        assert!(OperationResult::from_response(&register, 201, String::new()).is_success());
        assert!(OperationResult::from_response(&register, 409, String::new()).is_error());

        let create = Operation::CreateBudget {
            budget: NewBudget {
                category: "rent".to_string(),
                limit: 1200.0,
            },
        };
        assert!(OperationResult::from_response(&create, 201, String::new()).is_success());
        assert!(OperationResult::from_response(&create, 200, String::new()).is_error());
    }
}
