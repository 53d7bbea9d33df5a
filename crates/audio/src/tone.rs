use std::f32::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Output gain for synthesized cues, well below clipping.
const GAIN: f32 = 0.2;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// One sample at `phase` cycles; only the fractional part matters.
    pub fn sample(self, phase: f32) -> f32 {
        let phase = phase.rem_euclid(1.0);
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

/// Render a mono cue into a sample buffer. A short linear ramp on both
/// ends keeps the tone free of clicks.
pub fn render_tone(
    frequency_hz: f64,
    waveform: Waveform,
    duration: Duration,
    sample_rate: u32,
) -> Vec<f32> {
    let total = (duration.as_secs_f64() * f64::from(sample_rate)).round() as usize;
    if total == 0 {
        return Vec::new();
    }
    // ~5 ms fade against clicks
    let ramp = (sample_rate / 200).max(1) as usize;
    let step = frequency_hz / f64::from(sample_rate);
    let mut phase = 0f64;
    (0..total)
        .map(|index| {
            let sample = waveform.sample(phase.fract() as f32) * envelope(index, total, ramp);
            phase += step;
            sample * GAIN
        })
        .collect()
}

fn envelope(index: usize, total: usize, ramp: usize) -> f32 {
    let attack = (index as f32 / ramp as f32).min(1.0);
    let release = ((total - index) as f32 / ramp as f32).min(1.0);
    attack.min(release)
}
