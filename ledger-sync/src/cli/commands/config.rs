use anyhow::{Context, Result};
use colored::*;

use super::AppContext;
use crate::cli::ConfigCommands;
use crate::config::{self, config_path};

pub fn handle_config_command(ctx: &AppContext, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            match ctx.config_path.clone().or_else(config_path) {
                Some(path) if path.exists() => {
                    println!("{} {}", "# file:".dimmed(), path.display())
                }
                _ => println!("{}", "# no config file, defaults and environment only".dimmed()),
            }
            print!("{}", ctx.config.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init => {
            let path = ctx
                .config_path
                .clone()
                .or_else(config_path)
                .context("Could not determine the config directory; pass --config")?;
            config::init(&path)?;
            println!("{} Wrote {}", "✓".green(), path.display().to_string().cyan());
            Ok(())
        }
    }
}
