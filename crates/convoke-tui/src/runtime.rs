//! TUI runtime: owns the terminal, collects events, executes effects.

use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use convoke_core::config::AudioConfig;
use convoke_core::interrupt;
use convoke_core::media::MediaElement;
use convoke_core::tone::ToneEmitter;
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::audio::CpalOutput;
use crate::effects::{ToneCue, UiEffect};
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Target frame interval while something is animating (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll interval when only the blink phase changes.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Terminal state is restored on drop, panic, or a second Ctrl+C.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    tones: ToneEmitter,
    audio: AudioConfig,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Enters the alternate screen and builds the runtime.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(state: AppState, audio: AudioConfig) -> Result<Self> {
        // Panic hook goes in before the alternate screen
        terminal::install_panic_hook();
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        Ok(Self {
            terminal,
            state,
            tones: ToneEmitter::new(),
            audio,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits or a signal arrives.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        let startup = update::startup(&self.state);
        self.execute_effects(startup);
        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            if let Some(exit) =
                signal_exit(interrupt::is_interrupted(), interrupt::should_terminate())
            {
                return exit;
            }

            let mut events = self.collect_events()?;

            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(event, UiEvent::Tick { .. }) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Polls terminal input until the next tick is due, then emits the tick.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.state.is_animating() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };
        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());

        if event::poll(time_until_tick)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        let elapsed = self.last_tick.elapsed();
        if elapsed >= tick_interval {
            self.last_tick = Instant::now();
            events.push(UiEvent::Tick { elapsed });
            if self.state.media.advance(elapsed) {
                events.push(UiEvent::MediaEnded);
            }
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::UnlockAudio => self.unlock_audio(),
            UiEffect::UnlockMedia => {
                let media = &mut self.state.media;
                if let Err(e) = media.play() {
                    tracing::warn!("media unlock failed: {e:#}");
                }
                media.pause();
                media.reset();
            }
            UiEffect::PlayMedia => {
                if let Err(e) = self.state.media.play() {
                    tracing::error!("media playback failed: {e:#}");
                }
            }
            UiEffect::PlayTones(ToneCue::Boot) => self.tones.play_boot_sequence(),
            UiEffect::PlayTones(ToneCue::Keystroke) => {
                self.tones.play_keystroke(self.audio.keystroke_jitter());
            }
            UiEffect::PlayTones(ToneCue::Warning) => self.tones.play_warning(),
            UiEffect::OpenLink { url } => {
                tracing::info!(%url, "opening link");
                if let Err(e) = open::that(&url) {
                    tracing::warn!(%url, "failed to open link: {e}");
                }
            }
        }
    }

    fn unlock_audio(&mut self) {
        if !self.audio.enabled {
            tracing::debug!("audio disabled, tones stay silent");
            return;
        }
        if self.tones.is_active() {
            return;
        }
        match CpalOutput::open(self.audio.volume) {
            Ok(output) => self.tones.attach(Box::new(output)),
            Err(e) => tracing::warn!("audio unavailable: {e:#}"),
        }
    }
}

/// Maps pending signals onto the loop's exit.
///
/// Ctrl+C surfaces as [`interrupt::InterruptedError`] so the binary exits 130.
/// SIGTERM and SIGHUP are a clean quit.
fn signal_exit(interrupted: bool, terminated: bool) -> Option<Result<()>> {
    if interrupted {
        tracing::info!("interrupted");
        return Some(Err(interrupt::InterruptedError.into()));
    }
    if terminated {
        tracing::info!("quitting on signal");
        return Some(Ok(()));
    }
    None
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        self.tones.release();
        let _ = terminal::restore_terminal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_c_signal_exits_interrupted() {
        let Some(Err(e)) = signal_exit(true, false) else {
            panic!("expected an interrupted exit");
        };
        assert!(e.downcast_ref::<interrupt::InterruptedError>().is_some());

        // Ctrl+C wins over a pending terminate.
        let Some(Err(e)) = signal_exit(true, true) else {
            panic!("expected an interrupted exit");
        };
        assert!(e.downcast_ref::<interrupt::InterruptedError>().is_some());
    }

    #[test]
    fn test_terminate_signal_quits_cleanly() {
        assert!(matches!(signal_exit(false, true), Some(Ok(()))));
        assert!(signal_exit(false, false).is_none());
    }
}
