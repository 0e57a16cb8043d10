//! Sync command handlers

use anyhow::{Context, Result};
use colored::*;
use log::info;

use super::{AppContext, WorkbookStatus, load_workbook, stored_session};
use crate::api::{NewBudget, NewTransaction};
use crate::cli::{SyncCommands, TransactionSyncArgs};
use crate::sync::{
    DispatchMode, Dispatcher, ExtractOptions, Extracted, SyncReport, TransactionSyncOptions,
    extract, sync_transactions,
};
use crate::workbook::schema;

pub async fn handle_sync_command(ctx: &AppContext, command: SyncCommands) -> Result<()> {
    match command {
        SyncCommands::Transactions(args) => sync_transactions_command(ctx, args).await,
        SyncCommands::Budgets { skip_processed } => sync_budgets_command(ctx, skip_processed).await,
    }
}

async fn sync_transactions_command(ctx: &AppContext, args: TransactionSyncArgs) -> Result<()> {
    let settings = &ctx.config.sync;
    let store = ctx.store();
    let mut workbook = load_workbook(store.as_ref())?;
    let session = stored_session(&mut workbook)?;

    let options = ExtractOptions {
        skip_processed: args.skip_processed || settings.skip_processed,
    };
    let table = workbook.sheet_or_create(&schema::TRANSACTIONS);
    let extraction = match extract::<NewTransaction>(table, options) {
        Extracted::Ready(extraction) => extraction,
        Extracted::Empty { already_processed } => {
            print_nothing_to_sync(schema::TRANSACTIONS.name, already_processed.len());
            return Ok(());
        }
    };
    info!(
        "Extracted {} transactions from {} rows",
        extraction.len(),
        table.row_count().saturating_sub(1)
    );

    let client = ctx.client()?;
    let dispatcher = Dispatcher::new(&client, &session);
    let sync_options = TransactionSyncOptions {
        bulk: args.bulk,
        workers: args.workers.unwrap_or(settings.workers),
        fallback_to_single: args.fallback_single || settings.fallback_to_single,
    };
    let mut sink = WorkbookStatus::new(store.as_ref(), &mut workbook, &schema::TRANSACTIONS)?;

    let report = sync_transactions(&dispatcher, &extraction, sync_options, &mut sink)
        .await
        .context("Transactions sync failed")?;
    print_summary(schema::TRANSACTIONS.name, &report);
    Ok(())
}

async fn sync_budgets_command(ctx: &AppContext, skip_processed: bool) -> Result<()> {
    let store = ctx.store();
    let mut workbook = load_workbook(store.as_ref())?;
    let session = stored_session(&mut workbook)?;

    let options = ExtractOptions {
        skip_processed: skip_processed || ctx.config.sync.skip_processed,
    };
    let table = workbook.sheet_or_create(&schema::BUDGETS);
    let extraction = match extract::<NewBudget>(table, options) {
        Extracted::Ready(extraction) => extraction,
        Extracted::Empty { already_processed } => {
            print_nothing_to_sync(schema::BUDGETS.name, already_processed.len());
            return Ok(());
        }
    };

    let client = ctx.client()?;
    let dispatcher = Dispatcher::new(&client, &session);
    let mut sink = WorkbookStatus::new(store.as_ref(), &mut workbook, &schema::BUDGETS)?;

    let report = dispatcher
        .dispatch_each(&extraction, &mut sink)
        .await
        .context("Budgets sync failed")?;
    print_summary(schema::BUDGETS.name, &report);
    Ok(())
}

fn print_nothing_to_sync(sheet: &str, already_processed: usize) {
    if already_processed > 0 {
        println!(
            "{} No pending rows in {} ({} already processed)",
            "✓".green(),
            sheet.cyan(),
            already_processed
        );
    } else {
        println!("{} No eligible rows in {}", "•".yellow(), sheet.cyan());
    }
}

fn print_summary(sheet: &str, report: &SyncReport) {
    let mode = match report.mode {
        DispatchMode::Single => "per-record",
        DispatchMode::Bulk => "bulk",
        DispatchMode::BulkFallback => "per-record after bulk failure",
    };

    println!();
    println!("{} {} ({})", "Synced".bold(), sheet.cyan(), mode.dimmed());
    println!("  {} {}", "accepted:".green(), report.accepted());
    if report.rejected() > 0 {
        println!("  {} {}", "rejected:".red(), report.rejected());
    } else {
        println!("  {} 0", "rejected:".dimmed());
    }
    if report.already_processed() > 0 {
        println!(
            "  {} {}",
            "already processed:".dimmed(),
            report.already_processed()
        );
    }
    if let Some(totals) = report.reported {
        println!(
            "  {} accepted {}, rejected {}",
            "gateway reported:".dimmed(),
            totals.accepted,
            totals.rejected
        );
    }

    for (row, reason) in report.rejections() {
        println!("  {} row {}: {}", "✗".red(), row, reason.trim());
    }
}
