//! Auth command handlers

use anyhow::{Context, Result};
use colored::*;

use super::{AppContext, load_workbook, save_workbook};
use crate::api::{AuthClient, Credentials};
use crate::cli::AuthCommands;
use crate::credentials::CredentialStore;
use crate::workbook::schema;

pub async fn handle_auth_command(ctx: &AppContext, command: AuthCommands) -> Result<()> {
    match command {
        AuthCommands::Register => register(ctx).await,
        AuthCommands::Login { prompt } => login(ctx, prompt).await,
        AuthCommands::Logout => logout(ctx),
        AuthCommands::Status => status(ctx),
    }
}

fn require_credentials(credentials: &Credentials, need_password: bool) -> Result<()> {
    if credentials.email.trim().is_empty() {
        anyhow::bail!("Email missing from the Auth sheet (row 2, column A)");
    }
    if need_password && credentials.password.is_empty() {
        anyhow::bail!("Password missing from the Auth sheet (row 2, column B)");
    }
    Ok(())
}

async fn register(ctx: &AppContext) -> Result<()> {
    let store = ctx.store();
    let mut workbook = load_workbook(store.as_ref())?;
    let credentials =
        CredentialStore::new(workbook.sheet_or_create(&schema::AUTH)).credentials();
    require_credentials(&credentials, true)?;

    let client = ctx.client()?;
    AuthClient::new(&client).register(&credentials).await?;

    println!("{} Registered {}", "✓".green(), credentials.email.cyan());
    Ok(())
}

async fn login(ctx: &AppContext, prompt: bool) -> Result<()> {
    let store = ctx.store();
    let mut workbook = load_workbook(store.as_ref())?;
    let mut credentials_store = CredentialStore::new(workbook.sheet_or_create(&schema::AUTH));

    let mut credentials = credentials_store.credentials();
    if prompt {
        require_credentials(&credentials, false)?;
        credentials.password =
            rpassword::prompt_password(format!("Password for {}: ", credentials.email))
                .context("Failed to read password")?;
    }
    require_credentials(&credentials, true)?;

    let client = ctx.client()?;
    AuthClient::new(&client)
        .login_and_store(&credentials, &mut credentials_store)
        .await?;
    save_workbook(store.as_ref(), &workbook)?;

    println!("{} Logged in as {}", "✓".green(), credentials.email.cyan());
    Ok(())
}

fn logout(ctx: &AppContext) -> Result<()> {
    let store = ctx.store();
    let mut workbook = load_workbook(store.as_ref())?;
    CredentialStore::new(workbook.sheet_or_create(&schema::AUTH)).clear_session();
    save_workbook(store.as_ref(), &workbook)?;

    println!("{} Token removed", "✓".green());
    Ok(())
}

fn status(ctx: &AppContext) -> Result<()> {
    let store = ctx.store();
    let mut workbook = load_workbook(store.as_ref())?;
    let auth = workbook.sheet_or_create(&schema::AUTH);

    match CredentialStore::read_session(auth) {
        Ok(session) => println!(
            "{} Token stored for {}",
            "✓".green(),
            session.email().unwrap_or("<unknown>").cyan()
        ),
        Err(_) => println!(
            "{} Not logged in. Run {}",
            "✗".red(),
            "ledger-sync auth login".bold()
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_credentials() {
        assert!(require_credentials(&Credentials::new("", "pw"), true).is_err());
        assert!(require_credentials(&Credentials::new("me@example.com", ""), true).is_err());
        assert!(require_credentials(&Credentials::new("me@example.com", ""), false).is_ok());
        assert!(require_credentials(&Credentials::new("me@example.com", "pw"), true).is_ok());
    }
}
