//! Boot script model.
//!
//! A `Script` is the fixed, ordered list of terminal lines the sequencer types
//! out. Scripts are immutable once built; the player only reads them.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Semantic kind of a script line (drives styling and tone cues).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Command,
    Output,
    Warning,
    Blank,
}

/// One line of scripted terminal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub kind: LineKind,
    #[serde(default)]
    pub text: String,
    /// Pause after the line is fully typed, before the next line starts.
    #[serde(default)]
    pub delay_ms: u64,
    /// Whether a blinking cursor trails this line while typing is in progress.
    #[serde(default)]
    pub cursor: bool,
}

impl ScriptLine {
    pub fn new(kind: LineKind, text: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            kind,
            text: text.into(),
            delay_ms,
            cursor: false,
        }
    }

    pub fn blank(delay_ms: u64) -> Self {
        Self::new(LineKind::Blank, "", delay_ms)
    }

    #[must_use]
    pub fn with_cursor(mut self) -> Self {
        self.cursor = true;
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Number of revealable characters (Unicode scalar values).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Ordered, immutable script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    lines: Vec<ScriptLine>,
}

/// On-disk shape: a list of `[[line]]` tables.
#[derive(Debug, Serialize, Deserialize)]
struct ScriptFile {
    #[serde(default, rename = "line")]
    lines: Vec<ScriptLine>,
}

impl Script {
    /// Builds a script from lines.
    ///
    /// # Errors
    /// Returns an error if `lines` is empty.
    pub fn new(lines: Vec<ScriptLine>) -> Result<Self> {
        if lines.is_empty() {
            anyhow::bail!("Script must contain at least one line");
        }
        Ok(Self { lines })
    }

    /// Loads a script from a TOML file of `[[line]]` tables.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or is empty.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script from {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to load script from {}", path.display()))
    }

    /// Parses a script from TOML text.
    ///
    /// # Errors
    /// Returns an error if the TOML is invalid or has no lines.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ScriptFile = toml::from_str(contents).context("Failed to parse script")?;
        Self::new(file.lines)
    }

    /// Serializes the script back to `[[line]]` TOML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        let file = ScriptFile {
            lines: self.lines.clone(),
        };
        toml::to_string(&file).context("Failed to serialize script")
    }

    pub fn lines(&self) -> &[ScriptLine] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&ScriptLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of revealable characters across all lines.
    pub fn total_chars(&self) -> usize {
        self.lines.iter().map(ScriptLine::char_len).sum()
    }
}

impl Default for Script {
    /// The CONVOKE 8.0 boot script.
    fn default() -> Self {
        Self {
            lines: vec![
                ScriptLine::new(
                    LineKind::Command,
                    "ROOT@CONVOKE :~ /V8.0# ./INIT_SEQUENCE.SH",
                    0,
                ),
                ScriptLine::blank(200),
                ScriptLine::new(LineKind::Output, "> ESTABLISHING SECURE CONNECTION ...", 300),
                ScriptLine::new(LineKind::Output, "> CHECKING SYSTEM INTEGRITY ...", 400),
                ScriptLine::blank(300),
                ScriptLine::new(LineKind::Warning, "> WARNING: CLASSIFIED DATA DETECTED.", 400),
                ScriptLine::new(
                    LineKind::Output,
                    "> DECRYPTION SCHEDULED FOR: APRIL 2026",
                    300,
                ),
                ScriptLine::new(LineKind::Output, "> LOCATION: CLUSTER_INNOVATION_CENTRE", 300),
                ScriptLine::blank(200),
                ScriptLine::new(LineKind::Command, "ROOT@CONVOKE :~ /V8.0# ", 400).with_cursor(),
            ],
        }
    }
}
