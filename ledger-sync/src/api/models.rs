//! Request and response bodies exchanged with the auth service and gateway

use serde::{Deserialize, Serialize};

/// Email/password pair sent to the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful login body
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Transaction as submitted to `/api/transactions` and the bulk endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// `YYYY-MM-DD` when the cell held a recognizable date, otherwise the
    /// cell text as typed so the gateway can reject it with a reason
    pub date: String,
}

/// Budget as submitted to `/api/budgets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub limit: f64,
}

/// Body of a 200 response from the bulk import endpoint
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BulkImportResponse {
    #[serde(default)]
    pub accepted: u64,
    #[serde(default)]
    pub rejected: u64,
    #[serde(default)]
    pub errors: Vec<BulkImportError>,
}

/// One rejected item, keyed by its position in the submitted array
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BulkImportError {
    pub index: i64,
    pub error: String,
}

/// Stored transaction as listed by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
}

/// Stored budget as listed by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: String,
    pub limit: f64,
    #[serde(default)]
    pub period: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_payload_shape() {
        let tx = NewTransaction {
            amount: 10.0,
            category: "food".to_string(),
            description: String::new(),
            date: "2025-01-01".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&tx).unwrap(),
            json!({"amount": 10.0, "category": "food", "description": "", "date": "2025-01-01"})
        );
    }

    #[test]
    fn test_bulk_response_defaults() {
        let parsed: BulkImportResponse =
            serde_json::from_str(r#"{"accepted": 3, "rejected": 0}"#).unwrap();
        assert_eq!(parsed.accepted, 3);
        assert!(parsed.errors.is_empty());

        let parsed: BulkImportResponse = serde_json::from_str(
            r#"{"accepted": 2, "rejected": 1, "errors": [{"index": 1, "error": "bad date"}]}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.errors,
            vec![BulkImportError {
                index: 1,
                error: "bad date".to_string()
            }]
        );
    }
}
