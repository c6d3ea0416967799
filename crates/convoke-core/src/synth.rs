//! Sample synthesis for tone cues.
//!
//! `Mixer` keeps a sample clock and the set of scheduled voices. Tone offsets
//! are resolved against that clock when scheduled, so a burst keeps its
//! internal spacing regardless of when the device pulls the next buffer.

use std::path::Path;

use anyhow::{Context, Result};

use crate::tone::Tone;

#[derive(Debug, Clone, Copy)]
struct Voice {
    tone: Tone,
    /// Absolute sample index where the tone begins.
    start: u64,
    /// Absolute sample index where the tone ends (exclusive).
    end: u64,
}

/// Mono tone mixer.
#[derive(Debug, Clone)]
pub struct Mixer {
    sample_rate: u32,
    volume: f32,
    clock: u64,
    voices: Vec<Voice>,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            volume: 1.0,
            clock: 0,
            voices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Schedules tones relative to the current clock.
    pub fn schedule(&mut self, tones: &[Tone]) {
        let rate = f64::from(self.sample_rate);
        for tone in tones {
            let start = self.clock + (tone.offset.as_secs_f64() * rate).round() as u64;
            let len = (tone.duration.as_secs_f64() * rate).round() as u64;
            if len == 0 {
                continue;
            }
            self.voices.push(Voice {
                tone: *tone,
                start,
                end: start + len,
            });
        }
    }

    /// Renders the next `out.len()` mono samples and advances the clock.
    pub fn render(&mut self, out: &mut [f32]) {
        let rate = self.sample_rate as f32;
        for (i, slot) in out.iter_mut().enumerate() {
            let now = self.clock + i as u64;
            let mut acc = 0.0;
            for voice in &self.voices {
                if now >= voice.start && now < voice.end {
                    let t = (now - voice.start) as f32 / rate;
                    acc += voice.tone.sample(t);
                }
            }
            *slot = (acc * self.volume).clamp(-1.0, 1.0);
        }
        self.clock += out.len() as u64;
        let clock = self.clock;
        self.voices.retain(|v| v.end > clock);
    }

    /// Renders every scheduled voice to completion.
    pub fn render_all(&mut self) -> Vec<f32> {
        let tail = self
            .voices
            .iter()
            .map(|v| v.end)
            .max()
            .unwrap_or(self.clock)
            .saturating_sub(self.clock);
        let mut out = vec![0.0; tail as usize];
        self.render(&mut out);
        out
    }
}

/// Renders `tones` to a 16-bit mono WAV file.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_wav(path: &Path, tones: &[Tone], sample_rate: u32) -> Result<usize> {
    let mut mixer = Mixer::new(sample_rate);
    mixer.schedule(tones);
    let samples = mixer.render_all();

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: mixer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for sample in &samples {
        let value = (sample * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(value)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize {}", path.display()))?;

    Ok(samples.len())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::tempdir;

    use super::*;
    use crate::tone::{self, DECAY_FLOOR};

    const RATE: u32 = 48_000;

    #[test]
    fn test_silent_when_idle() {
        let mut mixer = Mixer::new(RATE);
        let mut buf = [1.0f32; 64];
        mixer.render(&mut buf);
        assert!(buf.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_offsets_resolve_against_clock() {
        let mut mixer = Mixer::new(1000);
        let mut buf = [0.0f32; 10];
        mixer.render(&mut buf);

        mixer.schedule(&[Tone::new(100.0, Duration::from_millis(5), Duration::from_millis(10), 0.5)]);
        let mut buf = [0.0f32; 20];
        mixer.render(&mut buf);

        assert!(buf[..5].iter().all(|s| *s == 0.0));
        assert!(buf[5] > 0.0);
        assert!(buf[15..].iter().all(|s| *s == 0.0));
        assert!(mixer.render_all().is_empty());
    }

    #[test]
    fn test_voice_decays() {
        let mut mixer = Mixer::new(RATE);
        mixer.schedule(&[tone::keystroke(400.0)]);
        let samples = mixer.render_all();
        assert_eq!(samples.len(), 720);
        let first = samples[0].abs();
        let last = samples[samples.len() - 1].abs();
        assert!((first - 0.04).abs() < 1e-4);
        assert!(last < DECAY_FLOOR * 1.1);
    }

    #[test]
    fn test_volume_scales_output() {
        let mut loud = Mixer::new(RATE);
        let mut quiet = Mixer::new(RATE).with_volume(0.5);
        loud.schedule(&[tone::keystroke(400.0)]);
        quiet.schedule(&[tone::keystroke(400.0)]);
        let a = loud.render_all();
        let b = quiet.render_all();
        assert!((a[0] * 0.5 - b[0]).abs() < 1e-6);
    }

    #[test]
    fn test_write_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("warning.wav");
        let written = write_wav(&path, &tone::warning(), 8000).unwrap();
        // 240 ms offset + 100 ms tone.
        assert_eq!(written, 2720);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len() as usize, written);
    }
}
