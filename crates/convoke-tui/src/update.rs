//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use std::time::Duration;

use convoke_core::sequence::{Cue, ViewState};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::effects::{ToneCue, UiEffect};
use crate::events::UiEvent;
use crate::state::{AppState, Mode};

/// Effects to run once before the first frame.
pub fn startup(app: &AppState) -> Vec<UiEffect> {
    match app.mode {
        // Background loop: autoplay, muted.
        Mode::Landing => vec![UiEffect::PlayMedia],
        Mode::ComingSoon => vec![],
    }
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick { elapsed } => {
            app.clock += elapsed;
            match app.mode {
                Mode::ComingSoon => {
                    let elapsed = if app.discard_next_elapsed {
                        app.discard_next_elapsed = false;
                        Duration::ZERO
                    } else {
                        elapsed
                    };
                    effects_for(app.player.advance(elapsed))
                }
                Mode::Landing => vec![],
            }
        }
        UiEvent::Frame { width, height } => {
            app.viewport = (width, height);
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, &event),
        UiEvent::MediaEnded => match app.mode {
            Mode::ComingSoon => effects_for(app.player.media_ended()),
            Mode::Landing => vec![],
        },
    }
}

/// Maps player cues onto runtime effects.
fn effects_for(cues: Vec<Cue>) -> Vec<UiEffect> {
    cues.into_iter()
        .filter_map(|cue| match cue {
            Cue::UnlockAudio => Some(UiEffect::UnlockAudio),
            Cue::UnlockMedia => Some(UiEffect::UnlockMedia),
            Cue::BootTones => Some(UiEffect::PlayTones(ToneCue::Boot)),
            Cue::KeystrokeTone => Some(UiEffect::PlayTones(ToneCue::Keystroke)),
            Cue::WarningTones => Some(UiEffect::PlayTones(ToneCue::Warning)),
            Cue::PlayMedia => Some(UiEffect::PlayMedia),
            Cue::ViewChanged(state) => {
                tracing::info!(state = state.label(), "view changed");
                None
            }
            Cue::Reveal { .. } => None,
        })
        .collect()
}

fn handle_terminal_event(app: &mut AppState, event: &Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, *key),
        Event::Mouse(mouse) => handle_mouse(app, *mouse),
        _ => vec![],
    }
}

fn is_quit_key(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | 'Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if is_quit_key(key) {
        app.should_quit = true;
        return vec![];
    }
    if app.mode == Mode::Landing {
        return vec![];
    }

    match app.view_state() {
        ViewState::Idle => start_sequence(app),
        ViewState::SocialsRevealed => handle_socials_key(app, key),
        _ => vec![],
    }
}

fn start_sequence(app: &mut AppState) -> Vec<UiEffect> {
    let cues = app.player.start();
    app.discard_next_elapsed = !cues.is_empty();
    effects_for(cues)
}

fn handle_socials_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let count = app.socials.len();
    if count == 0 {
        return vec![];
    }

    match key.code {
        KeyCode::Tab | KeyCode::Right | KeyCode::Down => {
            app.selected_social = (app.selected_social + 1) % count;
            vec![]
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Up => {
            app.selected_social = (app.selected_social + count - 1) % count;
            vec![]
        }
        KeyCode::Enter => open_selected(app),
        KeyCode::Char(c) => {
            let Some(n) = c.to_digit(10) else {
                return vec![];
            };
            let index = n as usize;
            if index == 0 || index > count {
                return vec![];
            }
            app.selected_social = index - 1;
            open_selected(app)
        }
        _ => vec![],
    }
}

fn open_selected(app: &AppState) -> Vec<UiEffect> {
    app.selected_link()
        .map(|link| UiEffect::OpenLink {
            url: link.url.clone(),
        })
        .into_iter()
        .collect()
}

fn handle_mouse(app: &mut AppState, mouse: MouseEvent) -> Vec<UiEffect> {
    if app.mode == Mode::Landing {
        return vec![];
    }
    match mouse.kind {
        MouseEventKind::Down(_) if app.view_state() == ViewState::Idle => start_sequence(app),
        _ => vec![],
    }
}
