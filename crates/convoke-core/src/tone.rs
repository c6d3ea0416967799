//! Synthesized tone cues.
//!
//! Tones are short square-wave bursts with an exponential gain decay. This
//! module only describes *what* to play; `synth::Mixer` renders samples and
//! an `AudioOutput` implementation delivers them to a device.

use std::ops::Range;
use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Gain every tone decays to by the end of its duration.
pub const DECAY_FLOOR: f32 = 0.001;

/// Boot burst frequencies, played in ascending order.
pub const BOOT_FREQUENCIES: [f32; 4] = [200.0, 300.0, 400.0, 600.0];

/// Default keystroke frequency range (Hz).
pub const KEYSTROKE_JITTER: Range<f32> = 350.0..500.0;

const BOOT_SPACING: Duration = Duration::from_millis(100);
const BOOT_DURATION: Duration = Duration::from_millis(80);
const BOOT_GAIN: f32 = 0.08;

const KEYSTROKE_DURATION: Duration = Duration::from_millis(15);
const KEYSTROKE_GAIN: f32 = 0.04;

const WARNING_FREQUENCY: f32 = 500.0;
const WARNING_OFFSETS_MS: [u64; 3] = [0, 120, 240];
const WARNING_DURATION: Duration = Duration::from_millis(100);
const WARNING_GAIN: f32 = 0.06;

/// A single square-wave tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    /// Start time relative to the audio clock at scheduling.
    pub offset: Duration,
    pub duration: Duration,
    /// Initial gain; decays exponentially to [`DECAY_FLOOR`].
    pub gain: f32,
}

impl Tone {
    pub fn new(frequency: f32, offset: Duration, duration: Duration, gain: f32) -> Self {
        Self {
            frequency,
            offset,
            duration,
            gain,
        }
    }

    /// Offset at which the tone stops.
    pub fn end(&self) -> Duration {
        self.offset + self.duration
    }

    /// Envelope gain `t` seconds into the tone (0 outside the tone).
    pub fn envelope(&self, t: f32) -> f32 {
        let duration = self.duration.as_secs_f32();
        if t < 0.0 || t >= duration || duration <= 0.0 || self.gain <= 0.0 {
            return 0.0;
        }
        let ratio = (DECAY_FLOOR / self.gain).min(1.0);
        self.gain * ratio.powf(t / duration)
    }

    /// Signed sample value `t` seconds into the tone.
    pub fn sample(&self, t: f32) -> f32 {
        let envelope = self.envelope(t);
        if envelope == 0.0 {
            return 0.0;
        }
        let phase = (t * self.frequency).fract();
        if phase < 0.5 { envelope } else { -envelope }
    }
}

/// Four ascending tones, 100 ms apart.
pub fn boot_sequence() -> Vec<Tone> {
    BOOT_FREQUENCIES
        .iter()
        .zip(0u32..)
        .map(|(freq, i)| Tone::new(*freq, BOOT_SPACING * i, BOOT_DURATION, BOOT_GAIN))
        .collect()
}

/// One short keystroke tick at `frequency`.
pub fn keystroke(frequency: f32) -> Tone {
    Tone::new(frequency, Duration::ZERO, KEYSTROKE_DURATION, KEYSTROKE_GAIN)
}

/// Three repeated 500 Hz tones.
pub fn warning() -> Vec<Tone> {
    WARNING_OFFSETS_MS
        .iter()
        .map(|ms| {
            Tone::new(
                WARNING_FREQUENCY,
                Duration::from_millis(*ms),
                WARNING_DURATION,
                WARNING_GAIN,
            )
        })
        .collect()
}

/// Destination for scheduled tones.
pub trait AudioOutput {
    /// Schedules `tones` relative to the output's current clock.
    ///
    /// # Errors
    /// Returns an error if the output can no longer accept audio.
    fn schedule(&mut self, tones: &[Tone]) -> Result<()>;
}

/// Plays tone cues on an optional audio output.
///
/// With no output attached (device unavailable or audio disabled) every
/// `play_*` call is a no-op.
pub struct ToneEmitter {
    output: Option<Box<dyn AudioOutput>>,
    rng: StdRng,
}

impl Default for ToneEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneEmitter {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self { output: None, rng }
    }

    /// Attaches an output, replacing any previous one.
    pub fn attach(&mut self, output: Box<dyn AudioOutput>) {
        self.output = Some(output);
    }

    /// Drops the output, releasing the device.
    pub fn release(&mut self) {
        if self.output.take().is_some() {
            tracing::debug!("audio output released");
        }
    }

    pub fn is_active(&self) -> bool {
        self.output.is_some()
    }

    pub fn play_boot_sequence(&mut self) {
        self.emit(&boot_sequence());
    }

    /// Plays a keystroke tick at a frequency drawn from `jitter`.
    pub fn play_keystroke(&mut self, jitter: Range<f32>) {
        if self.output.is_none() {
            return;
        }
        let frequency = if jitter.start < jitter.end {
            self.rng.gen_range(jitter)
        } else {
            jitter.start
        };
        self.emit(&[keystroke(frequency)]);
    }

    pub fn play_warning(&mut self) {
        self.emit(&warning());
    }

    fn emit(&mut self, tones: &[Tone]) {
        let Some(output) = self.output.as_mut() else {
            return;
        };
        if let Err(e) = output.schedule(tones) {
            tracing::debug!("tone dropped: {e:#}");
        }
    }
}
