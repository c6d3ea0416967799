//! Audio output backed by the default cpal device.
//!
//! The device callback pulls samples from a shared [`Mixer`]; scheduling a
//! tone only takes the lock long enough to push voices.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow, bail};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, Stream, StreamConfig};

use convoke_core::synth::Mixer;
use convoke_core::tone::{AudioOutput, Tone};

/// Live output stream. Dropping it stops playback.
pub struct CpalOutput {
    _stream: Stream,
    mixer: Arc<Mutex<Mixer>>,
}

impl CpalOutput {
    /// Opens the default output device and starts a silent stream.
    ///
    /// # Errors
    /// Returns an error if no device is available or the stream cannot start.
    pub fn open(volume: f32) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("No audio output device available")?;
        let supported = device
            .default_output_config()
            .context("Failed to get output config")?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let mixer = Arc::new(Mutex::new(
            Mixer::new(config.sample_rate.0).with_volume(volume),
        ));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&mixer))?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&mixer))?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&mixer))?,
            other => bail!("Unsupported sample format: {other}"),
        };
        stream.play().context("Failed to start output stream")?;

        tracing::debug!(
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            "audio output opened"
        );
        Ok(Self {
            _stream: stream,
            mixer,
        })
    }
}

impl AudioOutput for CpalOutput {
    fn schedule(&mut self, tones: &[Tone]) -> Result<()> {
        let mut mixer = self
            .mixer
            .lock()
            .map_err(|e| anyhow!("audio mixer lock poisoned: {e}"))?;
        mixer.schedule(tones);
        Ok(())
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mixer: Arc<Mutex<Mixer>>,
) -> Result<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = usize::from(config.channels).max(1);
    let mut scratch: Vec<f32> = Vec::new();

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let frames = data.len() / channels;
                scratch.resize(frames, 0.0);

                match mixer.lock() {
                    Ok(mut mixer) => mixer.render(&mut scratch),
                    Err(_) => scratch.fill(0.0),
                }

                for (frame, sample) in data.chunks_mut(channels).zip(&scratch) {
                    let value = T::from_sample(*sample);
                    frame.fill(value);
                }
            },
            |e| tracing::warn!("audio stream error: {e}"),
            None,
        )
        .context("Failed to build output stream")
}
