//! Boot sequence player.
//!
//! `SequencePlayer` is an explicit finite-state machine driven by elapsed
//! time. The host calls `advance(elapsed)` from its frame loop; every timer
//! that falls due inside that window fires in order, so a single large
//! `elapsed` fast-forwards the whole timeline deterministically.
//!
//! The player never performs I/O. Side effects (tones, media playback,
//! device unlock) are returned as `Cue`s for the host to execute.
//!
//! ## Timeline
//!
//! ```text
//! Idle ──start()──▶ Typing ──script done + settle──▶ Complete
//!   ──▶ Flicker(Boot) ──boot_flicker──▶ VideoPlaying
//!   ──media_ended()──▶ Flicker(Outro) ──outro_flicker──▶ SocialsRevealed
//! ```

use std::time::Duration;

use crate::script::{LineKind, Script};

/// Which of the two flicker transitions is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flicker {
    /// Between the finished terminal and the logo clip.
    Boot,
    /// Between the ended logo clip and the socials overlay.
    Outro,
}

/// Visible state of the component.
///
/// Strictly forward-progressing; see [`ViewState::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewState {
    Idle,
    Typing,
    Complete,
    FlickerTransition(Flicker),
    VideoPlaying,
    SocialsRevealed,
}

impl ViewState {
    /// Position in the fixed timeline. Transitions only ever increase this.
    pub fn rank(self) -> u8 {
        match self {
            ViewState::Idle => 0,
            ViewState::Typing => 1,
            ViewState::Complete => 2,
            ViewState::FlickerTransition(Flicker::Boot) => 3,
            ViewState::VideoPlaying => 4,
            ViewState::FlickerTransition(Flicker::Outro) => 5,
            ViewState::SocialsRevealed => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Typing => "typing",
            ViewState::Complete => "complete",
            ViewState::FlickerTransition(Flicker::Boot) => "flicker(boot)",
            ViewState::VideoPlaying => "video",
            ViewState::FlickerTransition(Flicker::Outro) => "flicker(outro)",
            ViewState::SocialsRevealed => "socials",
        }
    }
}

/// Timer durations for the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub char_interval: Duration,
    pub settle: Duration,
    pub boot_flicker: Duration,
    pub outro_flicker: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            char_interval: Duration::from_millis(18),
            settle: Duration::from_millis(800),
            boot_flicker: Duration::from_millis(1200),
            outro_flicker: Duration::from_millis(400),
        }
    }
}

/// Side effects requested by the player, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Acquire the audio output device.
    UnlockAudio,
    /// Prime the logo media (play, then pause and rewind).
    UnlockMedia,
    /// Four ascending boot tones.
    BootTones,
    /// Short keystroke tick.
    KeystrokeTone,
    /// Triple warning tone.
    WarningTones,
    /// Begin logo media playback.
    PlayMedia,
    /// A character was appended to `revealed[line]`.
    Reveal { line: usize, ch: char },
    /// The view state changed.
    ViewChanged(ViewState),
}

/// A script line as currently shown on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedLine {
    pub kind: LineKind,
    pub text: String,
    pub cursor: bool,
}

/// Typing progress through the script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub line_index: usize,
    pub char_index: usize,
    pub revealed: Vec<RevealedLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Appends `ch` to the active line; `audible` lines click.
    RevealChar { ch: char, audible: bool },
    NextLine,
    Settle,
    EndFlicker(Flicker),
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    remaining: Duration,
    step: Step,
}

/// Drives the scripted boot animation.
#[derive(Debug, Clone)]
pub struct SequencePlayer {
    script: Script,
    timing: Timing,
    state: ViewState,
    playback: PlaybackState,
    timer: Option<Timer>,
}

impl SequencePlayer {
    pub fn new(script: Script, timing: Timing) -> Self {
        Self {
            script,
            timing,
            state: ViewState::Idle,
            playback: PlaybackState::default(),
            timer: None,
        }
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn view_state(&self) -> ViewState {
        self.state
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn revealed_lines(&self) -> &[RevealedLine] {
        &self.playback.revealed
    }

    /// True once every script line has been typed and the settle delay ran.
    pub fn is_terminal_complete(&self) -> bool {
        self.state.rank() >= ViewState::Complete.rank()
    }

    /// Whether revealed line `line` shows its cursor.
    ///
    /// Every revealed line flagged `cursor` keeps it until the terminal
    /// completes, not only the line being typed.
    pub fn cursor_visible(&self, line: usize) -> bool {
        !self.is_terminal_complete()
            && self
                .playback
                .revealed
                .get(line)
                .is_some_and(|revealed| revealed.cursor)
    }

    /// Time until the next pending timer fires, if any.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.timer.map(|t| t.remaining)
    }

    /// Handles the start signal. Ignored once started.
    pub fn start(&mut self) -> Vec<Cue> {
        if self.state != ViewState::Idle {
            return Vec::new();
        }

        let mut cues = vec![Cue::UnlockAudio, Cue::UnlockMedia, Cue::BootTones];
        self.transition(ViewState::Typing, &mut cues);
        self.schedule_typing(&mut cues);
        cues
    }

    /// Consumes `elapsed` time, firing every timer that falls due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Cue> {
        let mut cues = Vec::new();
        let mut budget = elapsed;

        while let Some(timer) = self.timer.as_mut() {
            if timer.remaining > budget {
                timer.remaining -= budget;
                break;
            }
            budget -= timer.remaining;
            let step = timer.step;
            self.timer = None;
            self.fire(step, &mut cues);
        }

        cues
    }

    /// Handles the media "ended" notification.
    ///
    /// Only meaningful while the logo clip is playing; ignored otherwise.
    pub fn media_ended(&mut self) -> Vec<Cue> {
        if self.state != ViewState::VideoPlaying {
            tracing::debug!(state = self.state.label(), "ignoring media end");
            return Vec::new();
        }

        let mut cues = Vec::new();
        self.transition(ViewState::FlickerTransition(Flicker::Outro), &mut cues);
        self.schedule(self.timing.outro_flicker, Step::EndFlicker(Flicker::Outro));
        cues
    }

    fn fire(&mut self, step: Step, cues: &mut Vec<Cue>) {
        match step {
            Step::RevealChar { ch, audible } => {
                if let Some(revealed) = self.playback.revealed.last_mut() {
                    revealed.text.push(ch);
                }
                self.playback.char_index += 1;
                cues.push(Cue::Reveal {
                    line: self.playback.line_index,
                    ch,
                });
                if audible {
                    cues.push(Cue::KeystrokeTone);
                }
                self.schedule_typing(cues);
            }
            Step::NextLine => {
                self.playback.line_index += 1;
                self.playback.char_index = 0;
                self.schedule_typing(cues);
            }
            Step::Settle => {
                self.transition(ViewState::Complete, cues);
                self.transition(ViewState::FlickerTransition(Flicker::Boot), cues);
                self.schedule(self.timing.boot_flicker, Step::EndFlicker(Flicker::Boot));
            }
            Step::EndFlicker(Flicker::Boot) => {
                self.transition(ViewState::VideoPlaying, cues);
                cues.push(Cue::PlayMedia);
            }
            Step::EndFlicker(Flicker::Outro) => {
                self.transition(ViewState::SocialsRevealed, cues);
            }
        }
    }

    /// Schedules the next typing step for the active line.
    ///
    /// Opens the line (pushing it into `revealed`) when it first becomes
    /// active, so blank lines still occupy a row.
    fn schedule_typing(&mut self, cues: &mut Vec<Cue>) {
        let index = self.playback.line_index;
        let Some(line) = self.script.get(index) else {
            self.schedule(self.timing.settle, Step::Settle);
            return;
        };

        if self.playback.revealed.len() == index {
            self.playback.revealed.push(RevealedLine {
                kind: line.kind,
                text: String::new(),
                cursor: line.cursor,
            });
            if line.kind == LineKind::Warning {
                cues.push(Cue::WarningTones);
            }
        }

        if let Some(ch) = line.text.chars().nth(self.playback.char_index) {
            let audible = line.kind != LineKind::Blank && !ch.is_whitespace();
            self.schedule(self.timing.char_interval, Step::RevealChar { ch, audible });
        } else {
            let delay = line.delay();
            self.schedule(delay, Step::NextLine);
        }
    }

    fn schedule(&mut self, after: Duration, step: Step) {
        self.timer = Some(Timer {
            remaining: after,
            step,
        });
    }

    fn transition(&mut self, next: ViewState, cues: &mut Vec<Cue>) {
        debug_assert!(
            next.rank() > self.state.rank(),
            "view state must move forward: {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(from = self.state.label(), to = next.label(), "view state");
        self.state = next;
        cues.push(Cue::ViewChanged(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptLine;

    const FOREVER: Duration = Duration::from_secs(3600);
    const STEP: Duration = Duration::from_millis(1);

    fn player() -> SequencePlayer {
        SequencePlayer::new(Script::default(), Timing::default())
    }

    fn player_with(lines: Vec<ScriptLine>) -> SequencePlayer {
        SequencePlayer::new(Script::new(lines).unwrap(), Timing::default())
    }

    fn view_changes(cues: &[Cue]) -> Vec<ViewState> {
        cues.iter()
            .filter_map(|c| match c {
                Cue::ViewChanged(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    fn count(cues: &[Cue], wanted: Cue) -> usize {
        cues.iter().filter(|c| **c == wanted).count()
    }

    #[test]
    fn test_idle_until_started() {
        let mut p = player();
        assert!(p.advance(FOREVER).is_empty());
        assert_eq!(p.view_state(), ViewState::Idle);
        assert!(p.revealed_lines().is_empty());
    }

    #[test]
    fn test_start_emits_unlock_and_boot_once() {
        let mut p = player();
        let cues = p.start();
        assert_eq!(
            &cues[..4],
            &[
                Cue::UnlockAudio,
                Cue::UnlockMedia,
                Cue::BootTones,
                Cue::ViewChanged(ViewState::Typing)
            ]
        );
        assert_eq!(p.view_state(), ViewState::Typing);

        // Idempotent after the first trigger.
        assert!(p.start().is_empty());
        let rest = p.advance(FOREVER);
        assert_eq!(count(&rest, Cue::BootTones), 0);
    }

    #[test]
    fn test_full_playback_reveals_every_character() {
        let mut p = player();
        p.start();
        let cues = p.advance(FOREVER);

        let revealed: usize = p.revealed_lines().iter().map(|l| l.text.chars().count()).sum();
        assert_eq!(revealed, p.script().total_chars());
        let reveal_cues = cues.iter().filter(|c| matches!(c, Cue::Reveal { .. })).count();
        assert_eq!(reveal_cues, p.script().total_chars());

        for (line, revealed) in p.script().lines().iter().zip(p.revealed_lines()) {
            assert_eq!(line.text, revealed.text);
            assert_eq!(line.kind, revealed.kind);
        }
    }

    #[test]
    fn test_invariants_hold_at_every_millisecond() {
        let mut p = player();
        p.start();
        let len = p.script().len();
        let mut last_line = 0;

        for _ in 0..20_000 {
            let before = p.playback().clone();
            p.advance(STEP);
            let after = p.playback();

            if p.view_state() == ViewState::Typing {
                assert!(p.time_until_next().is_some());
            }
            assert!(after.line_index <= len);
            if let Some(line) = p.script().get(after.line_index) {
                assert!(after.char_index <= line.char_len());
                assert_eq!(after.revealed.len(), after.line_index + 1);
            } else {
                assert_eq!(after.revealed.len(), len);
            }

            if after.line_index != last_line {
                assert_eq!(after.line_index, last_line + 1);
                // A zero-delay line can finish and advance inside one step.
                let finished = &p.script().lines()[before.line_index];
                assert!(before.char_index + 1 >= finished.char_len());
                assert_eq!(after.revealed[before.line_index].text, finished.text);
                last_line = after.line_index;
            }
        }
        assert_eq!(last_line, len);
    }

    #[test]
    fn test_view_states_are_monotonic_to_socials() {
        let mut p = player();
        let mut seen = vec![p.view_state()];

        let mut cues = p.start();
        cues.extend(p.advance(FOREVER));
        assert_eq!(p.view_state(), ViewState::VideoPlaying);
        cues.extend(p.media_ended());
        cues.extend(p.advance(FOREVER));
        seen.extend(view_changes(&cues));

        assert_eq!(
            seen,
            vec![
                ViewState::Idle,
                ViewState::Typing,
                ViewState::Complete,
                ViewState::FlickerTransition(Flicker::Boot),
                ViewState::VideoPlaying,
                ViewState::FlickerTransition(Flicker::Outro),
                ViewState::SocialsRevealed,
            ]
        );
        assert!(seen.windows(2).all(|w| w[0].rank() < w[1].rank()));
    }

    #[test]
    fn test_end_to_end_reaches_socials_exactly_once() {
        let mut p = player();
        let mut cues = p.start();
        for _ in 0..5 {
            cues.extend(p.advance(FOREVER));
            cues.extend(p.media_ended());
            cues.extend(p.start());
        }
        let changes = view_changes(&cues);
        assert_eq!(
            changes
                .iter()
                .filter(|v| **v == ViewState::SocialsRevealed)
                .count(),
            1
        );
        assert_eq!(changes.iter().filter(|v| **v == ViewState::Typing).count(), 1);
        assert_eq!(p.view_state(), ViewState::SocialsRevealed);
        assert_eq!(count(&cues, Cue::PlayMedia), 1);
    }

    #[test]
    fn test_blank_line_emits_no_tones() {
        let mut p = player_with(vec![ScriptLine::blank(50)]);
        let mut cues = p.start();
        cues.extend(p.advance(FOREVER));
        assert_eq!(count(&cues, Cue::KeystrokeTone), 0);
        assert_eq!(count(&cues, Cue::WarningTones), 0);
        // The blank line still occupies a row.
        assert_eq!(p.revealed_lines().len(), 1);
        assert_eq!(p.revealed_lines()[0].text, "");
    }

    #[test]
    fn test_blank_kind_with_text_is_silent() {
        let mut p = player_with(vec![ScriptLine::new(LineKind::Blank, "...", 0)]);
        p.start();
        let cues = p.advance(FOREVER);
        assert_eq!(count(&cues, Cue::KeystrokeTone), 0);
        assert_eq!(p.revealed_lines()[0].text, "...");
    }

    #[test]
    fn test_warning_burst_precedes_first_reveal() {
        let mut p = player_with(vec![
            ScriptLine::new(LineKind::Output, "ok", 0),
            ScriptLine::new(LineKind::Warning, "X", 0),
        ]);
        let mut cues = p.start();
        cues.extend(p.advance(FOREVER));

        assert_eq!(count(&cues, Cue::WarningTones), 1);
        let warning_at = cues.iter().position(|c| *c == Cue::WarningTones).unwrap();
        let first_reveal = cues
            .iter()
            .position(|c| matches!(c, Cue::Reveal { line: 1, .. }))
            .unwrap();
        assert!(warning_at < first_reveal);
        // Nothing from the warning line is revealed before the burst.
        assert!(
            !cues[..warning_at]
                .iter()
                .any(|c| matches!(c, Cue::Reveal { line: 1, .. }))
        );
    }

    #[test]
    fn test_keystrokes_skip_spaces() {
        let mut p = player_with(vec![ScriptLine::new(LineKind::Command, "a b  c", 0)]);
        p.start();
        let cues = p.advance(FOREVER);
        assert_eq!(count(&cues, Cue::KeystrokeTone), 3);
    }

    #[test]
    fn test_character_cadence() {
        let mut p = player_with(vec![ScriptLine::new(LineKind::Output, "abcdef", 0)]);
        p.start();
        p.advance(Duration::from_millis(17));
        assert_eq!(p.playback().char_index, 0);
        p.advance(Duration::from_millis(1));
        assert_eq!(p.playback().char_index, 1);
        p.advance(Duration::from_millis(18 * 3));
        assert_eq!(p.playback().char_index, 4);
        assert_eq!(p.revealed_lines()[0].text, "abcd");
    }

    #[test]
    fn test_line_delay_and_settle() {
        let mut p = player_with(vec![
            ScriptLine::new(LineKind::Output, "a", 100),
            ScriptLine::new(LineKind::Output, "b", 0),
        ]);
        p.start();
        p.advance(Duration::from_millis(18));
        assert_eq!(p.playback().line_index, 0);
        p.advance(Duration::from_millis(99));
        assert_eq!(p.playback().line_index, 0);
        p.advance(Duration::from_millis(1));
        assert_eq!(p.playback().line_index, 1);

        // Second char, zero delay, then the settle timer.
        p.advance(Duration::from_millis(18));
        assert_eq!(p.playback().line_index, 2);
        assert_eq!(p.view_state(), ViewState::Typing);
        assert_eq!(p.time_until_next(), Some(Duration::from_millis(800)));
        let cues = p.advance(Duration::from_millis(800));
        assert_eq!(
            view_changes(&cues),
            vec![
                ViewState::Complete,
                ViewState::FlickerTransition(Flicker::Boot)
            ]
        );
    }

    #[test]
    fn test_flicker_durations() {
        let mut p = player_with(vec![ScriptLine::blank(0)]);
        p.start();
        p.advance(Duration::from_millis(800));
        assert_eq!(p.view_state(), ViewState::FlickerTransition(Flicker::Boot));
        p.advance(Duration::from_millis(1199));
        assert_eq!(p.view_state(), ViewState::FlickerTransition(Flicker::Boot));
        let cues = p.advance(Duration::from_millis(1));
        assert_eq!(p.view_state(), ViewState::VideoPlaying);
        assert_eq!(count(&cues, Cue::PlayMedia), 1);

        // No timer runs while the clip plays.
        assert_eq!(p.time_until_next(), None);
        assert!(p.advance(FOREVER).is_empty());

        p.media_ended();
        p.advance(Duration::from_millis(399));
        assert_eq!(p.view_state(), ViewState::FlickerTransition(Flicker::Outro));
        p.advance(Duration::from_millis(1));
        assert_eq!(p.view_state(), ViewState::SocialsRevealed);
    }

    #[test]
    fn test_media_end_ignored_outside_video() {
        let mut p = player();
        assert!(p.media_ended().is_empty());
        p.start();
        assert!(p.media_ended().is_empty());
        assert_eq!(p.view_state(), ViewState::Typing);
    }

    #[test]
    fn test_cursor_visible_on_prompt_until_complete() {
        let mut p = player_with(vec![
            ScriptLine::new(LineKind::Output, "boot", 0),
            ScriptLine::new(LineKind::Command, "$ ", 400).with_cursor(),
        ]);
        p.start();
        assert!(!p.cursor_visible(0));
        assert!(!p.cursor_visible(1));
        p.advance(Duration::from_millis(18 * 4));
        assert!(!p.cursor_visible(0));
        assert!(p.cursor_visible(1));
        p.advance(Duration::from_millis(18 * 2 + 400));
        assert!(p.cursor_visible(1));
        p.advance(Duration::from_millis(800));
        assert!(p.is_terminal_complete());
        assert!(!p.cursor_visible(1));
    }

    #[test]
    fn test_cursor_stays_on_earlier_lines() {
        let mut p = player_with(vec![
            ScriptLine::new(LineKind::Command, "$ a", 0).with_cursor(),
            ScriptLine::new(LineKind::Output, "ok", 0),
        ]);
        p.start();
        p.advance(Duration::from_millis(18 * 4));
        assert_eq!(p.playback().line_index, 1);
        assert!(p.cursor_visible(0));
        assert!(!p.cursor_visible(1));
        p.advance(FOREVER);
        assert!(!p.cursor_visible(0));
    }
}
