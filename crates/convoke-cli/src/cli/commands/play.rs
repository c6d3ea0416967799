//! Full-screen mode handlers.

use anyhow::{Context, Result};
use convoke_core::config::Config;

use crate::modes;

pub fn coming_soon(config: &Config) -> Result<()> {
    let script = config.effective_script().context("load boot script")?;
    tracing::info!(
        lines = script.len(),
        audio = config.audio.enabled,
        "starting coming-soon sequence"
    );
    modes::run_coming_soon(config, script)
}

pub fn landing(config: &Config) -> Result<()> {
    tracing::info!("starting landing loop");
    modes::run_landing(config)
}
