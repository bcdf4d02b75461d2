//! Synthesized completion tone.
//!
//! The tone is a short sine beep whose gain decays exponentially, rendered
//! to mono samples so it needs no audio files.

use std::f32::consts::TAU;
use std::time::Duration;

/// Sample rate used to render tones.
pub const TONE_SAMPLE_RATE: u32 = 44_100;

/// Parameters of a synthesized tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in hertz
    pub frequency: f32,
    /// Length of the tone
    pub duration: Duration,
    /// Gain at the start of the tone
    pub start_gain: f32,
    /// Gain reached at the end of the tone
    pub end_gain: f32,
}

impl Tone {
    /// The beep played when a session completes: 800 Hz for half a second,
    /// fading from 0.3 to 0.01.
    pub const COMPLETION: Tone = Tone {
        frequency: 800.0,
        duration: Duration::from_millis(500),
        start_gain: 0.3,
        end_gain: 0.01,
    };

    /// Number of samples at [`TONE_SAMPLE_RATE`].
    pub fn sample_count(&self) -> usize {
        (self.duration.as_secs_f64() * f64::from(TONE_SAMPLE_RATE)).round() as usize
    }

    /// Gain at normalized position `t` in `0.0..=1.0`.
    pub fn gain_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if self.start_gain <= 0.0 || self.end_gain <= 0.0 {
            // Exponential ramps are undefined through zero; fall back to linear.
            return self.start_gain + (self.end_gain - self.start_gain) * t;
        }
        self.start_gain * (self.end_gain / self.start_gain).powf(t)
    }

    /// Renders the tone as mono samples.
    pub fn render(&self) -> Vec<f32> {
        let count = self.sample_count();
        let rate = TONE_SAMPLE_RATE as f32;
        let last = count.saturating_sub(1).max(1) as f32;

        (0..count)
            .map(|i| {
                let phase = TAU * self.frequency * i as f32 / rate;
                phase.sin() * self.gain_at(i as f32 / last)
            })
            .collect()
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self::COMPLETION
    }
}
