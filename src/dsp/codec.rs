//! Software tone codec
//!
//! Runs in the audio sample loop: every input sample feeds the detector
//! bank and every output sample comes from the tone bank. The line state
//! machine drives it through [`AudioCapability`].

use crate::config::{AUDIO_SAMPLE_RATE, DETECTOR_BLOCK_SIZE};
use crate::error::Result;
use crate::hal::AudioCapability;

use super::goertzel::DetectorBank;
use super::oscillator::ToneBank;

/// Tone generator and DTMF detector sharing one sample stream
#[derive(Clone, Copy, Debug)]
pub struct SoftwareCodec {
    tones: ToneBank,
    detectors: DetectorBank,
}

impl SoftwareCodec {
    /// Create a silent codec
    #[must_use]
    pub fn new(sample_rate: u32, block_size: usize) -> Self {
        let rate = sample_rate as f32;
        Self {
            tones: ToneBank::new(rate),
            detectors: DetectorBank::new(rate, block_size),
        }
    }

    /// Consume one input sample and produce one output sample
    pub fn process(&mut self, input: f32) -> f32 {
        self.detectors.push(input);
        self.tones.next_sample()
    }

    /// Program one oscillator
    ///
    /// # Errors
    ///
    /// Returns an error for an oscillator index past the bank.
    pub fn set_tone(&mut self, index: usize, frequency: f32, amplitude: f32) -> Result<()> {
        self.tones.set(index, frequency, amplitude)
    }

    /// Energy at one detector channel
    ///
    /// # Errors
    ///
    /// Returns an error for a channel past the bank.
    pub fn energy(&self, channel: usize) -> Result<f32> {
        self.detectors.energy(channel)
    }

    /// Output side
    #[must_use]
    pub const fn tones(&self) -> &ToneBank {
        &self.tones
    }

    /// Input side
    #[must_use]
    pub const fn detectors(&self) -> &DetectorBank {
        &self.detectors
    }
}

impl Default for SoftwareCodec {
    fn default() -> Self {
        Self::new(AUDIO_SAMPLE_RATE, DETECTOR_BLOCK_SIZE)
    }
}

impl AudioCapability for SoftwareCodec {
    fn tone_energy(&mut self, channel: usize) -> f32 {
        self.energy(channel).unwrap_or_else(|e| {
            warn!("Codec: {}", e);
            0.0
        })
    }

    fn set_oscillator(&mut self, index: usize, frequency: f32, amplitude: f32) {
        if let Err(e) = self.set_tone(index, frequency, amplitude) {
            warn!("Codec: {}", e);
        }
    }
}
