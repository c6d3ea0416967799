//! Full-screen modes.
//!
//! - `coming_soon`: start screen, boot terminal, logo clip, socials
//! - `landing`: looping background clip
//!
//! Both live in the optional `tui` feature.

#[cfg(feature = "tui")]
pub use convoke_tui::{run_coming_soon, run_landing};

#[cfg(not(feature = "tui"))]
pub fn run_coming_soon(
    _config: &convoke_core::config::Config,
    _script: convoke_core::script::Script,
) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}

#[cfg(not(feature = "tui"))]
pub fn run_landing(_config: &convoke_core::config::Config) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
