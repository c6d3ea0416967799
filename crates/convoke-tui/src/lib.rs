//! Full-screen terminal front-ends for convoke.

pub mod audio;
pub mod clips;
pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use convoke_core::config::Config;
use convoke_core::script::Script;
use convoke_core::sequence::SequencePlayer;
pub use runtime::TuiRuntime;

use crate::state::AppState;

fn require_terminal(mode: &str) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "{mode} mode requires a terminal.\n\
             Use `convoke simulate` for a headless run."
        );
    }
    Ok(())
}

/// Runs the boot sequence: start screen, terminal, logo clip, socials.
///
/// # Errors
/// Returns an error if stdout is not a terminal or terminal I/O fails.
pub fn run_coming_soon(config: &Config, script: Script) -> Result<()> {
    require_terminal("Coming-soon")?;

    let player = SequencePlayer::new(script, config.timing.timing());
    let state = AppState::coming_soon(
        player,
        clips::logo_clip(&config.media),
        config.screen.clone(),
        config.socials.clone(),
    );

    let mut runtime = TuiRuntime::new(state, config.audio.clone())?;
    runtime.run()
}

/// Runs the looping background clip.
///
/// # Errors
/// Returns an error if stdout is not a terminal or terminal I/O fails.
pub fn run_landing(config: &Config) -> Result<()> {
    require_terminal("Landing")?;

    let state = AppState::landing(clips::landing_clip(&config.media));
    // Landing plays muted.
    let mut audio = config.audio.clone();
    audio.enabled = false;

    let mut runtime = TuiRuntime::new(state, audio)?;
    runtime.run()
}
