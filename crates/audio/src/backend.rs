use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, warn};

use crate::tone::{render_tone, Waveform};

/// Fire-and-forget audio cues. Implementations must never block the
/// caller for the length of the tone.
pub trait TonePlayer {
    fn play_tone(&self, frequency_hz: f64, waveform: Waveform, duration: Duration) -> Result<()>;
}

/// Discards every cue; used in tests and headless embeddings.
#[derive(Debug, Default)]
pub struct NullPlayer;

impl TonePlayer for NullPlayer {
    fn play_tone(&self, frequency_hz: f64, waveform: Waveform, duration: Duration) -> Result<()> {
        debug!(frequency_hz, ?waveform, ?duration, "discarding tone");
        Ok(())
    }
}

/// Plays cues through the default output device. Each tone runs on a
/// short-lived thread that owns the stream for the tone's lifetime.
#[derive(Debug, Default)]
pub struct CpalPlayer;

impl TonePlayer for CpalPlayer {
    fn play_tone(&self, frequency_hz: f64, waveform: Waveform, duration: Duration) -> Result<()> {
        thread::Builder::new()
            .name("solfa-tone".into())
            .spawn(move || {
                if let Err(err) = play_blocking(frequency_hz, waveform, duration) {
                    warn!(%err, "tone playback failed");
                }
            })?;
        Ok(())
    }
}

fn play_blocking(frequency_hz: f64, waveform: Waveform, duration: Duration) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no default output device"))?;
    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    let samples = render_tone(frequency_hz, waveform, duration, sample_rate);
    let mut cursor = 0usize;

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => device.build_output_stream(
            &config.config(),
            move |data: &mut [f32], _| {
                for frame in data.chunks_mut(channels) {
                    let sample = samples.get(cursor).copied().unwrap_or(0.0);
                    for slot in frame {
                        *slot = sample;
                    }
                    cursor = cursor.saturating_add(1);
                }
            },
            |err| warn!(%err, "output stream error"),
            None,
        )?,
        cpal::SampleFormat::I16 => device.build_output_stream(
            &config.config(),
            move |data: &mut [i16], _| {
                for frame in data.chunks_mut(channels) {
                    let sample = samples.get(cursor).copied().unwrap_or(0.0);
                    let value = (sample * f32::from(i16::MAX)) as i16;
                    for slot in frame {
                        *slot = value;
                    }
                    cursor = cursor.saturating_add(1);
                }
            },
            |err| warn!(%err, "output stream error"),
            None,
        )?,
        cpal::SampleFormat::U16 => device.build_output_stream(
            &config.config(),
            move |data: &mut [u16], _| {
                let center = f32::from(u16::MAX / 2);
                for frame in data.chunks_mut(channels) {
                    let sample = samples.get(cursor).copied().unwrap_or(0.0);
                    let value = (sample * center + center) as u16;
                    for slot in frame {
                        *slot = value;
                    }
                    cursor = cursor.saturating_add(1);
                }
            },
            |err| warn!(%err, "output stream error"),
            None,
        )?,
        other => bail!("unsupported sample format {other:?}"),
    };

    stream.play()?;
    // Keep the stream alive until the tone has drained.
    thread::sleep(duration + Duration::from_millis(100));
    Ok(())
}
