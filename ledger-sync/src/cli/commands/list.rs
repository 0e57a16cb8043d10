//! List transactions or budgets stored on the gateway

use anyhow::{Context, Result};
use colored::*;
use serde::de::DeserializeOwned;

use super::{AppContext, load_workbook, stored_session};
use crate::api::models::{Budget, Transaction};
use crate::api::{ApiClient, Operation, Session};
use crate::cli::{ListArgs, ListKind};
use crate::error::SyncError;
use crate::workbook::format_number;

pub async fn handle_list_command(ctx: &AppContext, args: ListArgs) -> Result<()> {
    let store = ctx.store();
    let mut workbook = load_workbook(store.as_ref())?;
    let session = stored_session(&mut workbook)?;
    let client = ctx.client()?;

    match args.kind {
        ListKind::Transactions => {
            let items: Vec<Transaction> =
                fetch_list(&client, &session, Operation::ListTransactions).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                print_transactions(&items);
            }
        }
        ListKind::Budgets => {
            let items: Vec<Budget> = fetch_list(&client, &session, Operation::ListBudgets).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                print_budgets(&items);
            }
        }
    }
    Ok(())
}

async fn fetch_list<T: DeserializeOwned>(
    client: &ApiClient,
    session: &Session,
    operation: Operation,
) -> Result<Vec<T>> {
    let result = client.execute(&operation, Some(session)).await?;
    if result.is_error() {
        return Err(SyncError::RequestFailed {
            status: result.status_code,
            body: result.body,
        }
        .into());
    }
    serde_json::from_str(&result.body)
        .with_context(|| format!("Unexpected {} response", operation.operation_type()))
}

fn print_transactions(items: &[Transaction]) {
    if items.is_empty() {
        println!("{}", "No transactions".dimmed());
        return;
    }
    println!(
        "{:>6}  {:<10}  {:>12}  {:<16}  {}",
        "ID".bold(),
        "DATE".bold(),
        "AMOUNT".bold(),
        "CATEGORY".bold(),
        "DESCRIPTION".bold()
    );
    for tx in items {
        println!(
            "{:>6}  {:<10}  {:>12}  {:<16}  {}",
            tx.id,
            tx.date,
            format_number(tx.amount),
            tx.category.cyan(),
            tx.description
        );
    }
    println!("{}", format!("{} transactions", items.len()).dimmed());
}

fn print_budgets(items: &[Budget]) {
    if items.is_empty() {
        println!("{}", "No budgets".dimmed());
        return;
    }
    println!(
        "{:<16}  {:>12}  {}",
        "CATEGORY".bold(),
        "LIMIT".bold(),
        "PERIOD".bold()
    );
    for budget in items {
        println!(
            "{:<16}  {:>12}  {}",
            budget.category.cyan(),
            format_number(budget.limit),
            budget.period
        );
    }
}
