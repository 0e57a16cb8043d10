use anyhow::Result;
use colored::*;

use super::{AppContext, save_workbook};
use crate::cli::WorkbookCommands;
use crate::workbook::Workbook;

pub fn handle_workbook_command(ctx: &AppContext, command: WorkbookCommands) -> Result<()> {
    match command {
        WorkbookCommands::Init { force } => {
            let store = ctx.store();
            if store.location().exists() && !force {
                anyhow::bail!(
                    "Workbook already exists: {} (use --force to replace it)",
                    store.location().display()
                );
            }
            save_workbook(store.as_ref(), &Workbook::with_default_sheets())?;
            println!(
                "{} Created {}",
                "✓".green(),
                store.location().display().to_string().cyan()
            );
            println!("  Fill in email and password on row 2 of the Auth sheet, then run");
            println!("  {}", "ledger-sync auth login".bold());
            Ok(())
        }
    }
}
