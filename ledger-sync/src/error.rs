use thiserror::Error;

/// Failures of the auth, sync and report operations
///
/// Per-row gateway rejections are not errors; they are recorded as
/// [`crate::sync::outcome::Outcome::Rejected`] and the operation carries on.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    #[error("Token missing from the Auth sheet. Run `ledger-sync auth login` first")]
    MissingSession,

    #[error("Bulk import failed (HTTP {status}): {body}")]
    BatchFailure { status: u16, body: String },

    #[error("Gateway response does not match the submitted batch: {0}")]
    ProtocolViolation(String),

    #[error("Request failed (HTTP {status}): {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Unexpected response body: {0}")]
    InvalidResponse(String),

    #[error("Failed to encode request body: {0}")]
    Encode(serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to write row status: {0:#}")]
    Status(anyhow::Error),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
