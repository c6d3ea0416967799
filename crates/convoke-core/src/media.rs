//! Frame-based media clips.
//!
//! A `Clip` stands in for a video element: it plays a list of text frames at a
//! fixed frame duration, optionally looping, and reports its natural end
//! exactly once.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

/// Line that separates frames in a clip file.
pub const FRAME_SEPARATOR: &str = "---";

/// Playback surface the sequencer can drive.
pub trait MediaElement {
    /// Starts or resumes playback.
    ///
    /// # Errors
    /// Returns an error if playback cannot start (nothing to play).
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    /// Rewinds to the first frame and clears the ended flag.
    fn reset(&mut self);

    /// Advances playback; returns true exactly once, on natural end.
    fn advance(&mut self, elapsed: Duration) -> bool;
}

/// Text-frame clip.
#[derive(Debug, Clone)]
pub struct Clip {
    frames: Vec<String>,
    frame_duration: Duration,
    looping: bool,
    position: Duration,
    playing: bool,
    ended: bool,
}

impl Clip {
    pub fn new(frames: Vec<String>, frame_duration: Duration, looping: bool) -> Self {
        Self {
            frames,
            frame_duration: frame_duration.max(Duration::from_millis(1)),
            looping,
            position: Duration::ZERO,
            playing: false,
            ended: false,
        }
    }

    /// Loads frames from a text file, split on `---` lines.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path, frame_duration: Duration, looping: bool) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read clip from {}", path.display()))?;
        Ok(Self::new(parse_frames(&contents), frame_duration, looping))
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Total length of one pass through the clip.
    pub fn duration(&self) -> Duration {
        self.frame_duration * self.frames.len() as u32
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn frame_index(&self) -> usize {
        if self.frames.is_empty() {
            return 0;
        }
        let index = (self.position.as_millis() / self.frame_duration.as_millis()) as usize;
        index.min(self.frames.len() - 1)
    }

    /// Frame to display now, if the clip has any.
    pub fn current_frame(&self) -> Option<&str> {
        self.frames.get(self.frame_index()).map(String::as_str)
    }
}

impl MediaElement for Clip {
    fn play(&mut self) -> Result<()> {
        if self.frames.is_empty() {
            anyhow::bail!("clip has no frames");
        }
        if self.ended {
            self.reset();
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn reset(&mut self) {
        self.position = Duration::ZERO;
        self.ended = false;
    }

    fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.playing || self.frames.is_empty() {
            return false;
        }

        let total = self.duration();
        self.position += elapsed;
        if self.position < total {
            return false;
        }

        if self.looping {
            let wrapped = self.position.as_nanos() % total.as_nanos();
            self.position = Duration::from_nanos(wrapped as u64);
            false
        } else {
            self.position = total;
            self.playing = false;
            self.ended = true;
            true
        }
    }
}

/// Splits clip text into frames on separator lines.
pub fn parse_frames(contents: &str) -> Vec<String> {
    let mut frames = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in contents.lines() {
        if line.trim_end() == FRAME_SEPARATOR {
            frames.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        frames.push(current.join("\n"));
    }
    frames.retain(|f| !f.trim().is_empty());
    frames
}
