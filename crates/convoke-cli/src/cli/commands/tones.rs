//! Tone export.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use convoke_core::config::Config;
use convoke_core::synth;
use convoke_core::tone::{self, Tone};

/// Sample rate for exported files.
const EXPORT_SAMPLE_RATE: u32 = 44_100;

/// Writes each tone burst to its own WAV file under `out`.
pub fn export(config: &Config, out: &Path) -> Result<()> {
    fs::create_dir_all(out)
        .with_context(|| format!("create output directory {}", out.display()))?;

    let jitter = config.audio.keystroke_jitter();
    let keystroke_hz = (jitter.start + jitter.end) / 2.0;

    let bursts: [(&str, Vec<Tone>); 3] = [
        ("boot.wav", tone::boot_sequence()),
        ("keystroke.wav", vec![tone::keystroke(keystroke_hz)]),
        ("warning.wav", tone::warning()),
    ];

    for (name, tones) in bursts {
        let path = out.join(name);
        let samples = synth::write_wav(&path, &tones, EXPORT_SAMPLE_RATE)?;
        tracing::debug!(path = %path.display(), samples, "exported tone burst");
        println!("Wrote {} ({samples} samples)", path.display());
    }

    Ok(())
}
