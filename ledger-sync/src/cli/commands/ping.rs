use anyhow::Result;
use colored::*;

use super::AppContext;
use crate::api::Operation;

pub async fn handle_ping_command(ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    let gateway = &client.endpoints().gateway_url;
    let result = client.execute(&Operation::Ping, None).await?;

    if result.is_success() {
        println!("{} Gateway {} is up", "✓".green(), gateway.cyan());
        Ok(())
    } else {
        anyhow::bail!(
            "Gateway {} answered HTTP {}: {}",
            gateway,
            result.status_code,
            result.body.trim()
        )
    }
}
