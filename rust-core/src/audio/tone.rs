//! Continuous-phase test tone
//!
//! A fixed-frequency sine, attenuated for headroom and scaled by the
//! sine-level parameter, added into every output channel. The same samples
//! feed the tone analysis track.

use crate::config::{DEFAULT_SAMPLE_RATE, TONE_ATTENUATION, TONE_FREQUENCY_HZ};
use std::f64::consts::TAU;

pub struct ToneSynthesizer {
    frequency_hz: f64,

    /// Radians, kept in [0, 2π)
    phase: f64,

    /// Radians per sample
    phase_increment: f64,
}

impl Default for ToneSynthesizer {
    fn default() -> Self {
        Self::new(TONE_FREQUENCY_HZ, DEFAULT_SAMPLE_RATE)
    }
}

impl ToneSynthesizer {
    pub fn new(frequency_hz: f64, sample_rate: f64) -> Self {
        let mut tone = Self {
            frequency_hz,
            phase: 0.0,
            phase_increment: 0.0,
        };
        tone.set_sample_rate(sample_rate);
        tone
    }

    /// Recompute the phase increment for a new sample rate
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.phase_increment = if sample_rate > 0.0 {
            TAU * self.frequency_hz / sample_rate
        } else {
            0.0
        };
    }

    /// Restart at zero phase
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Next sample: sin(phase) · level · attenuation
    #[inline]
    pub fn next_sample(&mut self, level: f32) -> f32 {
        let s = self.phase.sin() as f32 * level * TONE_ATTENUATION;

        self.phase += self.phase_increment;
        if self.phase >= TAU {
            // The increment exceeds a full turn when the rate is below the tone frequency
            self.phase = self.phase.rem_euclid(TAU);
        }

        s
    }

    /// Fill `out` with consecutive tone samples
    pub fn render_into(&mut self, out: &mut [f32], level: f32) {
        for s in out.iter_mut() {
            *s = self.next_sample(level);
        }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn phase_increment(&self) -> f64 {
        self.phase_increment
    }
}

/// Add `tone` into every channel, starting at sample `offset`
pub fn mix_into_channels<C: AsMut<[f32]>>(channels: &mut [C], offset: usize, tone: &[f32]) {
    for channel in channels.iter_mut() {
        let channel = channel.as_mut();
        let start = offset.min(channel.len());
        for (dst, &s) in channel[start..].iter_mut().zip(tone) {
            *dst += s;
        }
    }
}
