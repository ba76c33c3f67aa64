//! Config file commands.

use anyhow::Context;

use crate::config::{self, Config};

/// Print the config file location
pub fn cmd_config_path() -> anyhow::Result<()> {
    let path = config::config_path().context("Could not determine config directory")?;
    println!("{}", path.display());
    Ok(())
}

/// Write a config file with defaults, keeping an existing one unless forced
pub fn cmd_config_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path().context("Could not determine config directory")?;
    if path.exists() && !force {
        println!("Config already exists at {} (use --force to overwrite)", path.display());
        return Ok(());
    }

    let path = config::save(&Config::default())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
