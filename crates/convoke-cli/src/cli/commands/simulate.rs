//! Headless boot-sequence run.
//!
//! Fast-forwards the player from timer to timer, standing in for the logo
//! clip with a fixed length, and prints the view-state timeline.

use std::time::Duration;

use anyhow::{Context, Result};
use convoke_core::config::Config;
use convoke_core::script::Script;
use convoke_core::sequence::{Cue, SequencePlayer, Timing, ViewState};

/// Counts and timeline collected from one run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub transitions: Vec<(Duration, ViewState)>,
    pub revealed_chars: usize,
    pub revealed_lines: usize,
    pub boot_tones: usize,
    pub keystroke_tones: usize,
    pub warning_tones: usize,
    pub reached_socials: bool,
}

impl Report {
    fn record(&mut self, at: Duration, cues: Vec<Cue>) {
        for cue in cues {
            match cue {
                Cue::BootTones => self.boot_tones += 1,
                Cue::KeystrokeTone => self.keystroke_tones += 1,
                Cue::WarningTones => self.warning_tones += 1,
                Cue::Reveal { .. } => self.revealed_chars += 1,
                Cue::ViewChanged(state) => self.transitions.push((at, state)),
                Cue::UnlockAudio | Cue::UnlockMedia | Cue::PlayMedia => {}
            }
        }
    }
}

/// Plays `script` to the end with a clip of length `clip`.
pub fn simulate(script: Script, timing: Timing, clip: Duration) -> Report {
    let mut player = SequencePlayer::new(script, timing);
    let mut report = Report::default();
    let mut clock = Duration::ZERO;

    report.record(clock, player.start());
    loop {
        let cues = if let Some(wait) = player.time_until_next() {
            clock += wait;
            player.advance(wait)
        } else if player.view_state() == ViewState::VideoPlaying {
            clock += clip;
            player.media_ended()
        } else {
            break;
        };
        report.record(clock, cues);
    }

    report.revealed_lines = player.revealed_lines().len();
    report.reached_socials = player.view_state() == ViewState::SocialsRevealed;
    report
}

pub fn run(config: &Config, clip_ms: u64) -> Result<()> {
    let script = config.effective_script().context("load boot script")?;
    let report = simulate(
        script,
        config.timing.timing(),
        Duration::from_millis(clip_ms),
    );

    for (at, state) in &report.transitions {
        println!("[{:>6} ms] {}", at.as_millis(), state.label());
    }
    println!();
    println!(
        "revealed: {} chars across {} lines",
        report.revealed_chars, report.revealed_lines
    );
    println!(
        "tones: boot {}, keystroke {}, warning {}",
        report.boot_tones, report.keystroke_tones, report.warning_tones
    );
    if report.reached_socials {
        println!("reached: socials");
    } else {
        println!("stopped before socials");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use convoke_core::script::{LineKind, ScriptLine};
    use convoke_core::sequence::Flicker;

    use super::*;

    #[test]
    fn test_default_script_reaches_socials() {
        let script = Script::default();
        let chars = script.total_chars();
        let lines = script.len();

        let report = simulate(script, Timing::default(), Duration::from_secs(4));
        assert!(report.reached_socials);
        assert_eq!(report.revealed_chars, chars);
        assert_eq!(report.revealed_lines, lines);
        assert_eq!(report.boot_tones, 1);

        let states: Vec<ViewState> = report.transitions.iter().map(|(_, s)| *s).collect();
        assert_eq!(
            states,
            vec![
                ViewState::Typing,
                ViewState::Complete,
                ViewState::FlickerTransition(Flicker::Boot),
                ViewState::VideoPlaying,
                ViewState::FlickerTransition(Flicker::Outro),
                ViewState::SocialsRevealed,
            ]
        );
    }

    #[test]
    fn test_timeline_timestamps() {
        let script = Script::new(vec![ScriptLine::new(LineKind::Output, "ab", 100)]).unwrap();
        let timing = Timing::default();
        let report = simulate(script, timing, Duration::from_millis(500));

        let at = |state: ViewState| {
            report
                .transitions
                .iter()
                .find(|(_, s)| *s == state)
                .map(|(t, _)| *t)
                .unwrap()
        };
        let typed = timing.char_interval * 2 + Duration::from_millis(100);
        assert_eq!(at(ViewState::Typing), Duration::ZERO);
        assert_eq!(at(ViewState::Complete), typed + timing.settle);
        assert_eq!(
            at(ViewState::VideoPlaying),
            typed + timing.settle + timing.boot_flicker
        );
        assert_eq!(
            at(ViewState::SocialsRevealed),
            typed
                + timing.settle
                + timing.boot_flicker
                + Duration::from_millis(500)
                + timing.outro_flicker
        );
        assert_eq!(report.keystroke_tones, 2);
        assert_eq!(report.warning_tones, 0);
    }
}
