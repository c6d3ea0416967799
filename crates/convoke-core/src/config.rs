//! Configuration management for convoke.
//!
//! Loads configuration from ${CONVOKE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::script::Script;
use crate::sequence::Timing;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for convoke configuration and data directories.
    //!
    //! CONVOKE_HOME resolution order:
    //! 1. CONVOKE_HOME environment variable (if set)
    //! 2. ~/.config/convoke (default)

    use std::path::PathBuf;

    /// Returns the convoke home directory.
    pub fn convoke_home() -> PathBuf {
        if let Ok(home) = std::env::var("CONVOKE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".convoke"),
            |h| h.join(".config").join("convoke"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        convoke_home().join("config.toml")
    }

    /// Returns the default log file for full-screen modes.
    pub fn log_path() -> PathBuf {
        convoke_home().join("logs").join("convoke.log")
    }
}

/// Timer durations, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub char_interval_ms: u64,
    pub settle_ms: u64,
    pub boot_flicker_ms: u64,
    pub outro_flicker_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            char_interval_ms: timing.char_interval.as_millis() as u64,
            settle_ms: timing.settle.as_millis() as u64,
            boot_flicker_ms: timing.boot_flicker.as_millis() as u64,
            outro_flicker_ms: timing.outro_flicker.as_millis() as u64,
        }
    }
}

impl TimingConfig {
    pub fn timing(&self) -> Timing {
        Timing {
            char_interval: Duration::from_millis(self.char_interval_ms),
            settle: Duration::from_millis(self.settle_ms),
            boot_flicker: Duration::from_millis(self.boot_flicker_ms),
            outro_flicker: Duration::from_millis(self.outro_flicker_ms),
        }
    }
}

/// Tone output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub volume: f32,
    pub keystroke_min_hz: f32,
    pub keystroke_max_hz: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 1.0,
            keystroke_min_hz: crate::tone::KEYSTROKE_JITTER.start,
            keystroke_max_hz: crate::tone::KEYSTROKE_JITTER.end,
        }
    }
}

impl AudioConfig {
    /// Keystroke jitter range, ordered low to high.
    pub fn keystroke_jitter(&self) -> std::ops::Range<f32> {
        let low = self.keystroke_min_hz.min(self.keystroke_max_hz);
        let high = self.keystroke_min_hz.max(self.keystroke_max_hz);
        low..high
    }
}

/// Clip sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub frame_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_clip: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing_clip: Option<PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            frame_ms: 90,
            logo_clip: None,
            landing_clip: None,
        }
    }
}

impl MediaConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

/// Static strings shown on the start screen and HUD.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub version_tag: String,
    pub start_prompt: String,
    pub badge: String,
    pub hud_top_left: String,
    pub hud_top_right: String,
    pub hud_bottom_left: String,
    pub hud_bottom_right: String,
    pub socials_title: String,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            version_tag: "V8.0".to_string(),
            start_prompt: "CLICK TO INITIALIZE".to_string(),
            badge: "// CLASSIFIED //".to_string(),
            hud_top_left: "SYS://CONVOKE_8.0".to_string(),
            hud_top_right: "STATUS: ACTIVE".to_string(),
            hud_bottom_left: "SECTOR: CIC".to_string(),
            hud_bottom_right: "2026.03".to_string(),
            socials_title: "CONNECT_TO_NET:".to_string(),
        }
    }
}

/// A link shown in the socials overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

fn default_socials() -> Vec<SocialLink> {
    vec![
        SocialLink {
            label: "INSTAGRAM".to_string(),
            url: "https://instagram.com/convoke_cic".to_string(),
        },
        SocialLink {
            label: "LINKEDIN".to_string(),
            url: "https://linkedin.com/company/convoke-du-cic".to_string(),
        },
    ]
}

fn default_log_level() -> String {
    Config::DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_file: Option<PathBuf>,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default = "default_socials")]
    pub socials: Vec<SocialLink>,
}

impl Config {
    const DEFAULT_LOG_LEVEL: &str = "info";

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the script to play: `script_file` if set, else the built-in.
    ///
    /// # Errors
    /// Returns an error if `script_file` is set but cannot be loaded.
    pub fn effective_script(&self) -> Result<Script> {
        match &self.script_file {
            Some(path) => Script::load(path),
            None => Ok(Script::default()),
        }
    }

    /// Log file used by full-screen modes.
    pub fn effective_log_file(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(paths::log_path)
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Uses the embedded template for structure/comments and merges
    /// generated values from `Config::default()` into it.
    ///
    /// # Errors
    /// Returns an error if serialization or template parsing fails.
    pub fn generate() -> Result<String> {
        use toml_edit::{DocumentMut, Item};

        fn merge(target: &mut toml_edit::Table, source: &toml_edit::Table) {
            for (key, value) in source.iter() {
                match value {
                    Item::Value(v) => {
                        target[key] = Item::Value(v.clone());
                    }
                    Item::Table(src_table) => {
                        if let Some(Item::Table(target_table)) = target.get_mut(key) {
                            merge(target_table, src_table);
                        } else {
                            target[key] = Item::Table(src_table.clone());
                        }
                    }
                    Item::ArrayOfTables(arr) => {
                        target[key] = Item::ArrayOfTables(arr.clone());
                    }
                    Item::None => {}
                }
            }
        }

        let config = Config::default();
        let generated_toml =
            toml::to_string(&config).context("Failed to serialize default config to TOML")?;

        // Parse template as base (preserves comments)
        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;

        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        merge(doc.as_table_mut(), generated_doc.as_table());

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
            script_file: None,
            timing: TimingConfig::default(),
            audio: AudioConfig::default(),
            media: MediaConfig::default(),
            screen: ScreenConfig::default(),
            socials: default_socials(),
        }
    }
}
