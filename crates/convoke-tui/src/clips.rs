//! Built-in clips and clip loading.

use std::f32::consts::TAU;
use std::path::Path;

use convoke_core::config::MediaConfig;
use convoke_core::media::Clip;

/// Block glyphs for the logo word, five rows each.
const GLYPHS: [(char, [&str; 5]); 6] = [
    ('C', [" ████", "█    ", "█    ", "█    ", " ████"]),
    ('O', [" ███ ", "█   █", "█   █", "█   █", " ███ "]),
    ('N', ["█   █", "██  █", "█ █ █", "█  ██", "█   █"]),
    ('V', ["█   █", "█   █", "█   █", " █ █ ", "  █  "]),
    ('K', ["█  █ ", "█ █  ", "██   ", "█ █  ", "█  █ "]),
    ('E', ["█████", "█    ", "████ ", "█    ", "█████"]),
];

const LOGO_WORD: &str = "CONVOKE";
const TAGLINE: &str = "COMING SOON";

const REVEAL_FRAMES: usize = 12;
const GLITCH_FRAMES: usize = 6;
const HOLD_FRAMES: usize = 16;
const FADE_FRAMES_PER_GLYPH: usize = 3;
const FADE_GLYPHS: [char; 3] = ['▓', '▒', '░'];

const WAVE_FRAMES: usize = 32;
const WAVE_WIDTH: usize = 72;
const WAVE_HEIGHT: usize = 18;
const WAVE_PALETTE: &[u8] = b" .:-=+*#";

/// Logo clip: configured file, else the built-in animation. Plays once.
pub fn logo_clip(media: &MediaConfig) -> Clip {
    load_or(media.logo_clip.as_deref(), media, false, logo_frames)
}

/// Landing background: configured file, else the built-in wave. Loops.
pub fn landing_clip(media: &MediaConfig) -> Clip {
    load_or(media.landing_clip.as_deref(), media, true, landing_frames)
}

fn load_or(
    path: Option<&Path>,
    media: &MediaConfig,
    looping: bool,
    builtin: fn() -> Vec<String>,
) -> Clip {
    let frame_duration = media.frame_duration();
    if let Some(path) = path {
        match Clip::load(path, frame_duration, looping) {
            Ok(clip) if !clip.frames().is_empty() => return clip,
            Ok(_) => tracing::warn!(path = %path.display(), "clip has no frames, using built-in"),
            Err(e) => tracing::warn!("{e:#}, using built-in clip"),
        }
    }
    Clip::new(builtin(), frame_duration, looping)
}

fn logo_rows() -> Vec<String> {
    let mut rows = vec![String::new(); 5];
    for (i, letter) in LOGO_WORD.chars().enumerate() {
        let Some((_, glyph)) = GLYPHS.iter().find(|(c, _)| *c == letter) else {
            continue;
        };
        for (row, part) in rows.iter_mut().zip(glyph) {
            if i > 0 {
                row.push(' ');
            }
            row.push_str(part);
        }
    }
    rows
}

/// Column reveal, a short glitch, a hold with the tagline, then a fade.
pub fn logo_frames() -> Vec<String> {
    let rows = logo_rows();
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let mut frames = Vec::new();

    for step in 1..=REVEAL_FRAMES {
        let visible = width * step / REVEAL_FRAMES;
        let frame: Vec<String> = rows
            .iter()
            .map(|row| {
                let shown: String = row.chars().take(visible).collect();
                format!("{shown:<width$}")
            })
            .collect();
        frames.push(frame.join("\n"));
    }

    for step in 0..GLITCH_FRAMES {
        let frame: Vec<String> = rows
            .iter()
            .enumerate()
            .map(|(r, row)| shift_row(row, ((step * 7 + r * 3) % 5) as isize - 2))
            .collect();
        frames.push(frame.join("\n"));
    }

    let padding = width.saturating_sub(TAGLINE.len()) / 2;
    let held = format!(
        "{}\n\n{}{TAGLINE}",
        rows.join("\n"),
        " ".repeat(padding)
    );
    frames.extend(std::iter::repeat_n(held, HOLD_FRAMES));

    for glyph in FADE_GLYPHS {
        let faded = rows.join("\n").replace('█', &glyph.to_string());
        frames.extend(std::iter::repeat_n(faded, FADE_FRAMES_PER_GLYPH));
    }

    frames
}

fn shift_row(row: &str, offset: isize) -> String {
    if offset >= 0 {
        format!("{}{row}", " ".repeat(offset.unsigned_abs()))
    } else {
        let mut shifted: String = row.chars().skip(offset.unsigned_abs()).collect();
        shifted.push_str(&" ".repeat(offset.unsigned_abs()));
        shifted
    }
}

/// Interference pattern whose phase wraps after one pass.
pub fn landing_frames() -> Vec<String> {
    (0..WAVE_FRAMES)
        .map(|frame| {
            let t = frame as f32 / WAVE_FRAMES as f32 * TAU;
            (0..WAVE_HEIGHT)
                .map(|y| {
                    (0..WAVE_WIDTH)
                        .map(|x| wave_glyph(x as f32, y as f32, t))
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}

fn wave_glyph(x: f32, y: f32, t: f32) -> char {
    let v = (x * 0.18 + t).sin() + (y * 0.35 - t).cos() + ((x + y) * 0.09 + 2.0 * t).sin();
    let level = ((v + 3.0) / 6.0).clamp(0.0, 0.999);
    char::from(WAVE_PALETTE[(level * WAVE_PALETTE.len() as f32) as usize])
}

#[cfg(test)]
mod tests {
    use std::fs;

    use convoke_core::media::MediaElement;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_logo_frames_shape() {
        let frames = logo_frames();
        assert_eq!(
            frames.len(),
            REVEAL_FRAMES + GLITCH_FRAMES + HOLD_FRAMES + FADE_FRAMES_PER_GLYPH * 3
        );
        assert!(
            frames[0].matches('█').count() < frames[REVEAL_FRAMES - 1].matches('█').count()
        );
        assert!(frames[REVEAL_FRAMES + GLITCH_FRAMES].contains(TAGLINE));
        assert!(frames.last().unwrap().contains('░'));
        assert!(!frames.last().unwrap().contains('█'));
    }

    #[test]
    fn test_logo_reveal_grows() {
        let frames = logo_frames();
        let counts: Vec<usize> = frames[..REVEAL_FRAMES]
            .iter()
            .map(|f| f.matches('█').count())
            .collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_landing_frames_shape() {
        let frames = landing_frames();
        assert_eq!(frames.len(), WAVE_FRAMES);
        for frame in &frames {
            let rows: Vec<&str> = frame.lines().collect();
            assert_eq!(rows.len(), WAVE_HEIGHT);
            assert!(rows.iter().all(|r| r.len() == WAVE_WIDTH));
        }
        assert_ne!(frames[0], frames[1]);
    }

    #[test]
    fn test_builtin_clips_when_unconfigured() {
        let media = MediaConfig::default();
        let mut logo = logo_clip(&media);
        assert!(!logo.is_looping());
        assert!(logo.play().is_ok());
        assert!(logo.advance(logo.duration()));

        let landing = landing_clip(&media);
        assert!(landing.is_looping());
        assert_eq!(landing.frames().len(), WAVE_FRAMES);
    }

    #[test]
    fn test_configured_clip_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logo.txt");
        fs::write(&path, "one\n---\ntwo\n").unwrap();

        let media = MediaConfig {
            logo_clip: Some(path),
            ..MediaConfig::default()
        };
        let clip = logo_clip(&media);
        assert_eq!(clip.frames(), ["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_missing_clip_file_falls_back() {
        let tmp = TempDir::new().unwrap();
        let media = MediaConfig {
            landing_clip: Some(tmp.path().join("missing.txt")),
            ..MediaConfig::default()
        };
        assert_eq!(landing_clip(&media).frames().len(), WAVE_FRAMES);
    }
}
