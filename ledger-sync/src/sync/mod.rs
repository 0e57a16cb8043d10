//! Sheet-to-gateway synchronization
//!
//! Extraction picks eligible rows and builds the index map, the dispatcher
//! sends them and writes each row's outcome back through a status sink.

pub mod dispatch;
pub mod extract;
pub mod outcome;
pub mod record;
pub mod status;

use log::warn;

pub use dispatch::Dispatcher;
pub use extract::{ExtractOptions, Extracted, Extraction, extract};
pub use outcome::{DispatchMode, SyncReport};
pub use status::StatusSink;

use crate::api::NewTransaction;
use crate::error::{Result, SyncError};

/// How a transactions sync should reach the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionSyncOptions {
    /// Send everything in one bulk request instead of one request per row
    pub bulk: bool,
    /// Worker concurrency hint forwarded to the gateway on bulk imports
    pub workers: u32,
    /// Resend the batch record by record when the bulk request fails
    pub fallback_to_single: bool,
}

impl Default for TransactionSyncOptions {
    fn default() -> Self {
        Self {
            bulk: false,
            workers: 4,
            fallback_to_single: false,
        }
    }
}

/// Sync extracted transactions in the requested mode.
///
/// With fallback enabled a whole-batch failure (non-200 or no response)
/// resends the same extraction record by record. Protocol violations and
/// unreadable 200 responses never fall back: the gateway answered, so rows
/// may already be imported.
pub async fn sync_transactions(
    dispatcher: &Dispatcher<'_>,
    extraction: &Extraction<NewTransaction>,
    options: TransactionSyncOptions,
    sink: &mut dyn StatusSink,
) -> Result<SyncReport> {
    if !options.bulk {
        return dispatcher.dispatch_each(extraction, sink).await;
    }

    match dispatcher.dispatch_bulk(extraction, options.workers, sink).await {
        Err(e @ (SyncError::BatchFailure { .. } | SyncError::Transport(_)))
            if options.fallback_to_single =>
        {
            warn!("{}; resending {} records one by one", e, extraction.len());
            let mut report = dispatcher.dispatch_each(extraction, sink).await?;
            report.mode = DispatchMode::BulkFallback;
            Ok(report)
        }
        other => other,
    }
}
