//! Digital Oscillators
//!
//! Sine oscillators for call-progress tone generation.

use core::f32::consts::PI;
#[cfg(feature = "embedded")]
use micromath::F32Ext;

use crate::config::NUM_OSCILLATORS;
use crate::error::{Error, Result};

/// Sine wave oscillator using direct computation
#[derive(Clone, Copy, Debug)]
pub struct SineOscillator {
    /// Current phase (0.0 to 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
}

impl SineOscillator {
    /// Create a new sine oscillator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: 0.0,
            phase_inc: 0.0,
        }
    }

    /// Set frequency
    pub fn set_frequency(&mut self, freq_hz: f32, sample_rate: f32) {
        self.phase_inc = freq_hz / sample_rate;
    }

    /// Generate next sample
    pub fn next(&mut self) -> f32 {
        let sample = (self.phase * 2.0 * PI).sin();
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }

    /// Reset phase
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Get current phase
    #[must_use]
    pub fn phase(&self) -> f32 {
        self.phase
    }
}

impl Default for SineOscillator {
    fn default() -> Self {
        Self::new()
    }
}

/// Four summed oscillators, each with its own amplitude
#[derive(Clone, Copy, Debug)]
pub struct ToneBank {
    oscillators: [SineOscillator; NUM_OSCILLATORS],
    amplitudes: [f32; NUM_OSCILLATORS],
    sample_rate: f32,
}

impl ToneBank {
    /// Create a silent bank
    #[must_use]
    pub const fn new(sample_rate: f32) -> Self {
        Self {
            oscillators: [SineOscillator::new(); NUM_OSCILLATORS],
            amplitudes: [0.0; NUM_OSCILLATORS],
            sample_rate,
        }
    }

    /// Program one oscillator; amplitude 0 disables it
    ///
    /// # Errors
    ///
    /// Returns [`Error::OscillatorOutOfRange`] for an index past the bank.
    pub fn set(&mut self, index: usize, frequency: f32, amplitude: f32) -> Result<()> {
        let osc = self
            .oscillators
            .get_mut(index)
            .ok_or(Error::OscillatorOutOfRange(index))?;
        osc.set_frequency(frequency, self.sample_rate);
        if amplitude <= 0.0 {
            osc.reset();
        }
        self.amplitudes[index] = amplitude.max(0.0);
        Ok(())
    }

    /// Generate the next output sample, clamped to full scale
    pub fn next_sample(&mut self) -> f32 {
        self.oscillators
            .iter_mut()
            .zip(self.amplitudes)
            .filter(|(_, amplitude)| *amplitude > 0.0)
            .map(|(osc, amplitude)| osc.next() * amplitude)
            .sum::<f32>()
            .clamp(-1.0, 1.0)
    }
}
