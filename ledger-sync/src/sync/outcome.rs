//! Per-row outcomes shared by single and bulk dispatch

use crate::api::models::BulkImportResponse;
use crate::workbook::RowPosition;

/// Status text written for accepted rows
pub const STATUS_OK: &str = "OK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    /// Gateway rejection; the reason is the raw response text
    Rejected(String),
    /// Left out of the run because the row was already marked OK
    AlreadyProcessed,
}

impl Outcome {
    /// Rejection with the gateway's reason, or `fallback` when that reason
    /// is blank so the status cell never reads as untouched
    pub fn rejected(reason: impl Into<String>, fallback: impl FnOnce() -> String) -> Self {
        let reason = reason.into();
        if reason.trim().is_empty() {
            Outcome::Rejected(fallback())
        } else {
            Outcome::Rejected(reason)
        }
    }

    /// Text for the row's status cell; `None` leaves the cell untouched
    pub fn status_text(&self) -> Option<&str> {
        match self {
            Outcome::Accepted => Some(STATUS_OK),
            Outcome::Rejected(reason) => Some(reason),
            Outcome::AlreadyProcessed => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub row: RowPosition,
    pub outcome: Outcome,
}

impl RowOutcome {
    pub fn new(row: RowPosition, outcome: Outcome) -> Self {
        Self { row, outcome }
    }
}

/// Totals reported by the gateway for a bulk import; advisory only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportedTotals {
    pub accepted: u64,
    pub rejected: u64,
}

impl From<&BulkImportResponse> for ReportedTotals {
    fn from(response: &BulkImportResponse) -> Self {
        Self {
            accepted: response.accepted,
            rejected: response.rejected,
        }
    }
}

/// How the records reached the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Single,
    Bulk,
    /// Bulk request failed and the batch was resent record by record
    BulkFallback,
}

/// Everything a sync run decided, one entry per touched row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub mode: DispatchMode,
    pub outcomes: Vec<RowOutcome>,
    pub reported: Option<ReportedTotals>,
}

impl SyncReport {
    pub fn new(mode: DispatchMode, outcomes: Vec<RowOutcome>) -> Self {
        Self {
            mode,
            outcomes,
            reported: None,
        }
    }

    pub fn accepted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_accepted()).count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_rejected()).count()
    }

    pub fn already_processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.outcome == Outcome::AlreadyProcessed)
            .count()
    }

    pub fn rejections(&self) -> impl Iterator<Item = (RowPosition, &str)> + '_ {
        self.outcomes.iter().filter_map(|o| match &o.outcome {
            Outcome::Rejected(reason) => Some((o.row, reason.as_str())),
            _ => None,
        })
    }

    /// Append rows that were skipped as already processed, keeping row order
    pub fn with_already_processed(mut self, rows: &[RowPosition]) -> Self {
        self.outcomes.extend(
            rows.iter()
                .map(|row| RowOutcome::new(*row, Outcome::AlreadyProcessed)),
        );
        self.outcomes.sort_by_key(|o| o.row);
        self
    }
}
