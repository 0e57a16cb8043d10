//! Command handlers and the context they share

pub mod auth;
pub mod config;
pub mod list;
pub mod ping;
pub mod report;
pub mod sync;
pub mod workbook;

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::debug;

use super::{Cli, Commands};
use crate::api::{ApiClient, ApiLogger, ReqwestTransport, Session};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::sync::StatusSink;
use crate::workbook::{RowPosition, SheetSchema, Workbook, WorkbookStore, open_store, schema};

/// Effective settings for one invocation
pub struct AppContext {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl AppContext {
    /// Resolve config from file and environment, then apply global flags
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Config::resolve(cli.config.as_deref())?;
        if let Some(workbook) = &cli.workbook {
            config.workbook = workbook.clone();
        }
        Ok(Self {
            config,
            config_path: cli.config.clone(),
        })
    }

    pub fn store(&self) -> Box<dyn WorkbookStore> {
        open_store(&self.config.workbook)
    }

    pub fn client(&self) -> Result<ApiClient> {
        let transport = ReqwestTransport::new().context("Failed to build HTTP client")?;
        Ok(ApiClient::new(Box::new(transport), self.config.endpoints())
            .with_logger(ApiLogger::new(self.config.monitoring.clone())))
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::from_cli(&cli)?;
    debug!("Using workbook {}", ctx.config.workbook.display());

    match cli.command {
        Commands::Auth { command } => auth::handle_auth_command(&ctx, command).await,
        Commands::Sync { command } => sync::handle_sync_command(&ctx, command).await,
        Commands::Report(args) => report::handle_report_command(&ctx, args).await,
        Commands::List(args) => list::handle_list_command(&ctx, args).await,
        Commands::Ping => ping::handle_ping_command(&ctx).await,
        Commands::Config { command } => config::handle_config_command(&ctx, command),
        Commands::Workbook { command } => workbook::handle_workbook_command(&ctx, command),
    }
}

pub(crate) fn load_workbook(store: &dyn WorkbookStore) -> Result<Workbook> {
    store
        .load()
        .with_context(|| format!("Failed to open workbook: {}", store.location().display()))
}

pub(crate) fn save_workbook(store: &dyn WorkbookStore, workbook: &Workbook) -> Result<()> {
    store
        .save(workbook)
        .with_context(|| format!("Failed to save workbook: {}", store.location().display()))
}

/// Stored session from the Auth sheet
pub(crate) fn stored_session(workbook: &mut Workbook) -> Result<Session> {
    let table = workbook.sheet_or_create(&schema::AUTH);
    Ok(CredentialStore::read_session(table)?)
}

/// Writes statuses into the workbook and saves it on every flush, so
/// progress survives an interrupted run
pub(crate) struct WorkbookStatus<'a> {
    store: &'a dyn WorkbookStore,
    workbook: &'a mut Workbook,
    schema: &'static SheetSchema,
    column: usize,
}

impl<'a> WorkbookStatus<'a> {
    pub fn new(
        store: &'a dyn WorkbookStore,
        workbook: &'a mut Workbook,
        schema: &'static SheetSchema,
    ) -> Result<Self> {
        let column = schema
            .status_column
            .with_context(|| format!("Sheet '{}' has no status column", schema.name))?;
        Ok(Self {
            store,
            workbook,
            schema,
            column,
        })
    }
}

impl StatusSink for WorkbookStatus<'_> {
    fn write_status(&mut self, row: RowPosition, status: &str) -> Result<()> {
        self.workbook
            .sheet_or_create(self.schema)
            .set(row, self.column, status);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        save_workbook(self.store, self.workbook)
    }
}
