//! Script command handlers.

use anyhow::{Context, Result};
use convoke_core::config::Config;

pub fn show(config: &Config) -> Result<()> {
    let script = config.effective_script().context("load boot script")?;
    print!("{}", script.to_toml()?);
    Ok(())
}
