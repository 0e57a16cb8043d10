use anyhow::Result;
use colored::*;

use super::{AppContext, load_workbook, save_workbook, stored_session};
use crate::cli::ReportArgs;
use crate::report::{default_range, fetch_summary, render_report};
use crate::workbook::{format_number, schema};

/// Fetch the category summary and replace the Report sheet with it
pub async fn handle_report_command(ctx: &AppContext, args: ReportArgs) -> Result<()> {
    let (month_start, month_end) = default_range();
    let from = args.from.unwrap_or(month_start);
    let to = args.to.unwrap_or(month_end);
    if from > to {
        anyhow::bail!("--from {} is after --to {}", from, to);
    }

    let store = ctx.store();
    let mut workbook = load_workbook(store.as_ref())?;
    let session = stored_session(&mut workbook)?;

    let client = ctx.client()?;
    let rows = fetch_summary(&client, &session, from, to).await?;

    render_report(workbook.sheet_or_create(&schema::REPORT), &rows);
    save_workbook(store.as_ref(), &workbook)?;

    println!(
        "{} {} to {}",
        "Report".bold(),
        from.to_string().cyan(),
        to.to_string().cyan()
    );
    if rows.is_empty() {
        println!("  {}", "no transactions in range".dimmed());
    }
    let width = rows.iter().map(|r| r.category.len()).max().unwrap_or(0);
    for row in &rows {
        println!(
            "  {:<width$}  {}",
            row.category,
            format_number(row.total),
            width = width
        );
    }
    Ok(())
}
