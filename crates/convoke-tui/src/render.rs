//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects. Every layer is a function of the state
//! and its clock, so the same state always draws the same frame.

use convoke_core::script::LineKind;
use convoke_core::sequence::{Flicker, RevealedLine, ViewState};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::state::{AppState, Mode};

/// Glyph drawn at the end of the typing line.
const CURSOR_GLYPH: &str = "█";

/// Noise glyphs, darkest first.
const NOISE_GLYPHS: [&str; 5] = [" ", "░", "▒", "▓", "█"];

/// How long one noise pattern is held before it reshuffles.
const NOISE_FRAME_MS: u128 = 40;

/// Terminal padding inside the HUD frame.
const TERMINAL_MARGIN: u16 = 2;

const PHOSPHOR: Color = Color::Green;
const ALERT: Color = Color::Red;

/// Renders the whole screen for the current state.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    match app.mode {
        Mode::Landing => render_clip(app, frame, area),
        Mode::ComingSoon => match app.view_state() {
            ViewState::Idle => render_start_screen(app, frame, area),
            ViewState::Typing | ViewState::Complete => render_terminal(app, frame, area),
            ViewState::FlickerTransition(Flicker::Boot) => {
                render_terminal(app, frame, area);
                render_noise(app, frame.buffer_mut(), area);
            }
            ViewState::VideoPlaying => render_clip(app, frame, area),
            ViewState::FlickerTransition(Flicker::Outro) => {
                render_clip(app, frame, area);
                render_noise(app, frame.buffer_mut(), area);
            }
            ViewState::SocialsRevealed => {
                render_clip(app, frame, area);
                render_socials(app, frame, area);
            }
        },
    }

    render_scanlines(frame.buffer_mut(), area);
}

fn render_start_screen(app: &AppState, frame: &mut Frame, area: Rect) {
    render_hud(app, frame, area);

    let screen = &app.screen;
    let prompt = if app.blink_on() {
        format!("[ {} ]", screen.start_prompt)
    } else {
        format!("  {}  ", screen.start_prompt)
    };
    let lines = vec![
        Line::from(Span::styled(
            screen.badge.clone(),
            Style::default().fg(ALERT).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            prompt,
            Style::default().fg(PHOSPHOR).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            screen.version_tag.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let height = (lines.len() as u16).min(area.height);
    let body = Rect::new(
        area.x,
        area.y + area.height.saturating_sub(height) / 2,
        area.width,
        height,
    );
    frame.render_widget(Paragraph::new(lines).centered(), body);
}

/// Four HUD captions pinned to the corners.
fn render_hud(app: &AppState, frame: &mut Frame, area: Rect) {
    let screen = &app.screen;
    let style = Style::default().fg(Color::DarkGray);
    let top = Rect::new(area.x, area.y, area.width, 1);
    let bottom = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);

    frame.render_widget(Line::styled(screen.hud_top_left.as_str(), style), top);
    frame.render_widget(
        Line::styled(screen.hud_top_right.as_str(), style).right_aligned(),
        top,
    );
    if area.height > 1 {
        frame.render_widget(Line::styled(screen.hud_bottom_left.as_str(), style), bottom);
        frame.render_widget(
            Line::styled(screen.hud_bottom_right.as_str(), style).right_aligned(),
            bottom,
        );
    }
}

fn render_terminal(app: &AppState, frame: &mut Frame, area: Rect) {
    render_hud(app, frame, area);

    let inner = Rect::new(
        area.x + TERMINAL_MARGIN.min(area.width / 2),
        area.y + area.height.min(1),
        area.width.saturating_sub(TERMINAL_MARGIN * 2),
        area.height.saturating_sub(2),
    );
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let revealed = app.player.revealed_lines();
    let blink_on = app.blink_on();

    let mut lines: Vec<Line<'_>> = revealed
        .iter()
        .enumerate()
        .map(|(i, line)| terminal_line(line, blink_on && app.player.cursor_visible(i)))
        .collect();

    // Follow the newest line.
    let overflow = lines.len().saturating_sub(inner.height as usize);
    lines.drain(..overflow);

    frame.render_widget(Paragraph::new(lines), inner);
}

fn terminal_line(line: &RevealedLine, cursor: bool) -> Line<'_> {
    let style = match line.kind {
        LineKind::Command => Style::default().fg(PHOSPHOR).add_modifier(Modifier::BOLD),
        LineKind::Output => Style::default().fg(PHOSPHOR),
        LineKind::Warning => Style::default().fg(ALERT).add_modifier(Modifier::BOLD),
        LineKind::Blank => Style::default(),
    };

    let mut spans = vec![Span::styled(line.text.as_str(), style)];
    if cursor {
        spans.push(Span::styled(CURSOR_GLYPH, Style::default().fg(PHOSPHOR)));
    }
    Line::from(spans)
}

/// Draws the current clip frame centered as a block, keeping its columns aligned.
fn render_clip(app: &AppState, frame: &mut Frame, area: Rect) {
    let Some(current) = app.media.current_frame() else {
        return;
    };

    let rows: Vec<&str> = current.lines().collect();
    let width = rows
        .iter()
        .map(|row| UnicodeWidthStr::width(*row))
        .max()
        .unwrap_or(0) as u16;
    let width = width.min(area.width);
    let height = (rows.len() as u16).min(area.height);

    let block = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    let text: Vec<Line<'_>> = rows.into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(PHOSPHOR)),
        block,
    );
}

fn render_socials(app: &AppState, frame: &mut Frame, area: Rect) {
    let screen = &app.screen;
    let cursor = if app.blink_on() { "_" } else { " " };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                screen.socials_title.as_str(),
                Style::default().fg(PHOSPHOR).add_modifier(Modifier::BOLD),
            ),
            Span::styled(cursor, Style::default().fg(PHOSPHOR)),
        ]),
        Line::default(),
    ];

    for (i, link) in app.socials.iter().enumerate() {
        let mut style = Style::default().fg(PHOSPHOR);
        if i == app.selected_social {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("[ {} ]", link.label), style),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::styled(
        "tab select · enter open · q quit",
        Style::default().fg(Color::DarkGray),
    ));

    let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let width = (content_width + 4).min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PHOSPHOR));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    frame.render_widget(Paragraph::new(lines).centered(), inner);
}

/// Overlays a block-glyph static pattern seeded by the clock.
fn render_noise(app: &AppState, buf: &mut Buffer, area: Rect) {
    let seed = (app.clock.as_millis() / NOISE_FRAME_MS) as u64;
    let style = Style::default().fg(PHOSPHOR);

    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let h = noise_hash(x, y, seed);
            if h % 3 != 0 {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(NOISE_GLYPHS[((h >> 8) % 5) as usize]);
                cell.set_style(style);
            }
        }
    }
}

fn noise_hash(x: u16, y: u16, seed: u64) -> u64 {
    let mut h = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (u64::from(x) << 32)
        ^ u64::from(y).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h
}

/// Dims every other row for a CRT look.
fn render_scanlines(buf: &mut Buffer, area: Rect) {
    let dim = Style::default().add_modifier(Modifier::DIM);
    for y in (area.top()..area.bottom()).filter(|y| y % 2 == 1) {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_style(dim);
            }
        }
    }
}
