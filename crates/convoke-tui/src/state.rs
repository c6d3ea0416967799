//! Application state.
//!
//! ```text
//! AppState
//! ├── mode: Mode              (coming-soon or landing)
//! ├── player: SequencePlayer  (boot sequence FSM)
//! ├── media: Clip             (logo clip / landing loop; mutated by effects only)
//! ├── screen, socials         (static presentation config)
//! └── clock, viewport, selection, discard_next_elapsed
//! ```

use std::time::Duration;

use convoke_core::config::{ScreenConfig, SocialLink};
use convoke_core::media::Clip;
use convoke_core::script::Script;
use convoke_core::sequence::{SequencePlayer, Timing, ViewState};

/// Blink half-period for cursors and the start prompt.
const BLINK_HALF_PERIOD_MS: u128 = 530;

/// Which front-end is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Start screen, boot terminal, logo clip, socials.
    ComingSoon,
    /// Looping background clip only.
    Landing,
}

pub struct AppState {
    pub mode: Mode,
    pub should_quit: bool,
    pub player: SequencePlayer,
    pub media: Clip,
    pub screen: ScreenConfig,
    pub socials: Vec<SocialLink>,
    /// Index into `socials` highlighted in the overlay.
    pub selected_social: usize,
    /// Total time since the runtime started; drives blink and noise.
    pub clock: Duration,
    /// Set when the sequence starts; the next tick's elapsed time was spent
    /// idle and must not reach the player.
    pub discard_next_elapsed: bool,
    pub viewport: (u16, u16),
}

impl AppState {
    pub fn coming_soon(
        player: SequencePlayer,
        media: Clip,
        screen: ScreenConfig,
        socials: Vec<SocialLink>,
    ) -> Self {
        Self {
            mode: Mode::ComingSoon,
            should_quit: false,
            player,
            media,
            screen,
            socials,
            selected_social: 0,
            clock: Duration::ZERO,
            discard_next_elapsed: false,
            viewport: (0, 0),
        }
    }

    /// Landing state; the player stays idle for the whole session.
    pub fn landing(media: Clip) -> Self {
        let player = SequencePlayer::new(Script::default(), Timing::default());
        Self {
            mode: Mode::Landing,
            ..Self::coming_soon(player, media, ScreenConfig::default(), Vec::new())
        }
    }

    pub fn view_state(&self) -> ViewState {
        self.player.view_state()
    }

    /// Shared blink phase for the cursor, prompt brackets, and final `_`.
    pub fn blink_on(&self) -> bool {
        (self.clock.as_millis() / BLINK_HALF_PERIOD_MS).is_multiple_of(2)
    }

    pub fn selected_link(&self) -> Option<&SocialLink> {
        self.socials.get(self.selected_social)
    }

    /// Whether the frame loop needs fast ticks.
    pub fn is_animating(&self) -> bool {
        match self.mode {
            Mode::Landing => self.media.is_playing(),
            Mode::ComingSoon => {
                self.player.time_until_next().is_some() || self.media.is_playing()
            }
        }
    }
}
