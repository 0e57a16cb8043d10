//! Sync dispatcher: per-record and bulk submission with status write-back
//!
//! Both modes produce one [`RowOutcome`] per submitted row and hand it to
//! the same [`StatusSink`]. Bulk errors arrive keyed by compacted index and
//! are mapped back to sheet rows through the extraction's [`IndexMap`].

use log::{debug, warn};

use super::extract::{Extraction, IndexMap};
use super::outcome::{DispatchMode, Outcome, ReportedTotals, RowOutcome, SyncReport};
use super::record::SheetRecord;
use super::status::StatusSink;
use crate::api::models::BulkImportResponse;
use crate::api::{ApiClient, NewTransaction, Operation, Session};
use crate::error::{Result, SyncError};

pub struct Dispatcher<'a> {
    client: &'a ApiClient,
    session: &'a Session,
}

impl<'a> Dispatcher<'a> {
    pub fn new(client: &'a ApiClient, session: &'a Session) -> Self {
        Self { client, session }
    }

    /// Submit one record. 201 is acceptance, any other status or a failed
    /// connection is a rejection carrying the raw reason.
    pub async fn dispatch_one<R: SheetRecord>(&self, record: &R) -> Result<Outcome> {
        let operation = record.create_operation();
        match self.client.execute(&operation, Some(self.session)).await {
            Ok(result) if result.is_success() => Ok(Outcome::Accepted),
            Ok(result) => {
                let status = result.status_code;
                Ok(Outcome::rejected(result.body, || format!("HTTP {}", status)))
            }
            Err(SyncError::Transport(reason)) => Ok(Outcome::rejected(reason, || {
                "no response from gateway".to_string()
            })),
            Err(e) => Err(e),
        }
    }

    /// Submit records one request at a time, in row order. Each outcome is
    /// written and flushed before the next request goes out; a rejection
    /// never stops the loop.
    pub async fn dispatch_each<R: SheetRecord>(
        &self,
        extraction: &Extraction<R>,
        sink: &mut dyn StatusSink,
    ) -> Result<SyncReport> {
        let mut outcomes = Vec::with_capacity(extraction.len());

        for (row, record) in extraction.iter() {
            let outcome = self.dispatch_one(record).await?;
            match &outcome {
                Outcome::Accepted => debug!("Row {} accepted", row),
                Outcome::Rejected(reason) => warn!("Row {} rejected: {}", row, reason),
                Outcome::AlreadyProcessed => {}
            }

            if let Some(status) = outcome.status_text() {
                sink.write_status(row, status).map_err(SyncError::Status)?;
                sink.flush().map_err(SyncError::Status)?;
            }
            outcomes.push(RowOutcome::new(row, outcome));
        }

        Ok(SyncReport::new(DispatchMode::Single, outcomes)
            .with_already_processed(extraction.already_processed()))
    }

    /// Submit the whole compacted sequence in one request.
    ///
    /// A non-200 response is a [`SyncError::BatchFailure`] and nothing is
    /// written. On 200 the error list is reconciled before any write, so a
    /// protocol violation also leaves every status cell untouched.
    pub async fn dispatch_bulk(
        &self,
        extraction: &Extraction<NewTransaction>,
        workers: u32,
        sink: &mut dyn StatusSink,
    ) -> Result<SyncReport> {
        let operation = Operation::BulkImportTransactions {
            transactions: extraction.records().to_vec(),
            workers,
        };
        let result = self.client.execute(&operation, Some(self.session)).await?;
        if result.is_error() {
            return Err(SyncError::BatchFailure {
                status: result.status_code,
                body: result.body,
            });
        }

        let response: BulkImportResponse = serde_json::from_str(&result.body)
            .map_err(|e| SyncError::InvalidResponse(format!("bulk import: {}", e)))?;
        let outcomes = reconcile(extraction.index_map(), &response)?;

        for row_outcome in &outcomes {
            if let Some(status) = row_outcome.outcome.status_text() {
                sink.write_status(row_outcome.row, status)
                    .map_err(SyncError::Status)?;
            }
        }
        sink.flush().map_err(SyncError::Status)?;

        let mut report = SyncReport::new(DispatchMode::Bulk, outcomes)
            .with_already_processed(extraction.already_processed());
        let totals = ReportedTotals::from(&response);
        if totals.accepted != report.accepted() as u64 || totals.rejected != report.rejected() as u64
        {
            warn!(
                "Gateway totals (accepted {}, rejected {}) disagree with per-row results (accepted {}, rejected {})",
                totals.accepted,
                totals.rejected,
                report.accepted(),
                report.rejected()
            );
        }
        report.reported = Some(totals);

        Ok(report)
    }
}

/// Map bulk errors onto sheet rows.
///
/// Every compacted index yields exactly one outcome: rejected with the
/// reported reason when it appears in `errors`, accepted otherwise. Error
/// indices outside the submitted batch, or reported twice, are protocol
/// violations.
pub fn reconcile(index_map: &IndexMap, response: &BulkImportResponse) -> Result<Vec<RowOutcome>> {
    let submitted = index_map.len();
    let mut reasons: Vec<Option<&str>> = vec![None; submitted];

    for error in &response.errors {
        let index = usize::try_from(error.index)
            .ok()
            .filter(|i| *i < submitted)
            .ok_or_else(|| {
                SyncError::ProtocolViolation(format!(
                    "error index {} is outside the submitted batch of {} records",
                    error.index, submitted
                ))
            })?;

        if reasons[index].is_some() {
            return Err(SyncError::ProtocolViolation(format!(
                "error index {} is reported more than once",
                index
            )));
        }
        reasons[index] = Some(error.error.as_str());
    }

    Ok(index_map
        .iter()
        .map(|(index, row)| {
            let outcome = match reasons[index.0] {
                Some(reason) => Outcome::rejected(reason, || {
                    format!("rejected by gateway (item {})", index)
                }),
                None => Outcome::Accepted,
            };
            RowOutcome::new(row, outcome)
        })
        .collect())
}
