pub mod commands;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ledger-sync",
    version,
    about = "Sync ledger rows from a workbook to the transactions gateway."
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: <config dir>/ledger-sync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Workbook: an .xlsx file or a directory of CSV sheets
    #[arg(long, global = true)]
    pub workbook: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register, log in and manage the stored token.
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Send sheet rows to the gateway and write back their status.
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Fetch the category summary into the Report sheet.
    Report(ReportArgs),
    /// List records stored on the gateway.
    List(ListArgs),
    /// Check that the gateway is reachable.
    Ping,
    /// Show or create the config file.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the workbook itself.
    Workbook {
        #[command(subcommand)]
        command: WorkbookCommands,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account with the Auth sheet credentials.
    Register,
    /// Log in and store the token in the Auth sheet.
    Login {
        /// Ask for the password instead of reading it from the sheet
        #[arg(long)]
        prompt: bool,
    },
    /// Remove the stored token.
    Logout,
    /// Show whether a token is stored.
    Status,
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Sync the Transactions sheet.
    Transactions(TransactionSyncArgs),
    /// Sync the Budgets sheet, one request per row.
    Budgets {
        /// Leave out rows already marked OK
        #[arg(long = "skip-processed")]
        skip_processed: bool,
    },
}

#[derive(Args)]
pub struct TransactionSyncArgs {
    /// Send all rows in one bulk request
    #[arg(long)]
    pub bulk: bool,
    /// Worker hint for the bulk endpoint
    #[arg(long, requires = "bulk", value_parser = clap::value_parser!(u32).range(1..))]
    pub workers: Option<u32>,
    /// Resend row by row when the bulk request fails
    #[arg(long = "fallback-single", requires = "bulk")]
    pub fallback_single: bool,
    /// Leave out rows already marked OK
    #[arg(long = "skip-processed")]
    pub skip_processed: bool,
}

#[derive(Args)]
pub struct ReportArgs {
    /// First day, YYYY-MM-DD (default: start of this month)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day, YYYY-MM-DD (default: end of this month)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(subcommand)]
    pub kind: ListKind,
    /// Print raw JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ListKind {
    /// Transactions stored on the gateway.
    Transactions,
    /// Budgets stored on the gateway.
    Budgets,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration.
    Show,
    /// Write a default config file.
    Init,
}

#[derive(Subcommand)]
pub enum WorkbookCommands {
    /// Create a workbook with every sheet and its header row.
    Init {
        /// Replace an existing workbook
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bulk_sync() {
        let cli = Cli::try_parse_from([
            "ledger-sync",
            "-v",
            "--workbook",
            "book.xlsx",
            "sync",
            "transactions",
            "--bulk",
            "--workers",
            "8",
            "--fallback-single",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.workbook, Some(PathBuf::from("book.xlsx")));
        match cli.command {
            Commands::Sync {
                command: SyncCommands::Transactions(args),
            } => {
                assert!(args.bulk);
                assert_eq!(args.workers, Some(8));
                assert!(args.fallback_single);
                assert!(!args.skip_processed);
            }
            _ => panic!("expected sync transactions"),
        }
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(
            Cli::try_parse_from(["ledger-sync", "sync", "transactions", "--bulk", "--workers", "0"])
                .is_err()
        );
    }

    #[test]
    fn test_workers_requires_bulk() {
        assert!(
            Cli::try_parse_from(["ledger-sync", "sync", "transactions", "--workers", "2"]).is_err()
        );
    }

    #[test]
    fn test_report_dates_parse() {
        let cli =
            Cli::try_parse_from(["ledger-sync", "report", "--from", "2025-12-01"]).unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.from, NaiveDate::from_ymd_opt(2025, 12, 1));
                assert_eq!(args.to, None);
            }
            _ => panic!("expected report"),
        }
    }
}
