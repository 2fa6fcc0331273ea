//! DAC Driver
//!
//! Drives the line audio output with the synthesized call-progress tones.

use embassy_stm32::dac::{DacChannel, Value};

/// Line output sample
#[derive(Clone, Copy, Debug)]
pub struct DacSample {
    /// 12-bit DAC value (0-4095)
    value: u16,
}

impl DacSample {
    /// Create from raw 12-bit value
    #[must_use]
    pub const fn from_raw(value: u16) -> Self {
        Self {
            value: if value > 4095 { 4095 } else { value },
        }
    }

    /// Create from signed audio sample (-1.0 to 1.0)
    #[must_use]
    pub fn from_audio(sample: f32) -> Self {
        let clamped = sample.clamp(-1.0, 1.0);
        let raw = ((clamped + 1.0) * 2047.5) as u16;
        Self::from_raw(raw)
    }

    /// Get the raw 12-bit value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.value
    }

    /// Convert to embassy DAC value
    #[must_use]
    pub const fn as_dac_value(self) -> Value {
        Value::Bit12Right(self.value)
    }
}

impl Default for DacSample {
    fn default() -> Self {
        Self::from_raw(2048) // Mid-scale (line idle)
    }
}

impl defmt::Format for DacSample {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "DAC({})", self.value);
    }
}

/// Line audio output
pub struct AudioDac<'d, T: embassy_stm32::dac::Instance> {
    channel: DacChannel<'d, T, 1>,
}

impl<'d, T: embassy_stm32::dac::Instance> AudioDac<'d, T> {
    /// Create a new audio DAC driver, parked at mid-scale
    #[must_use]
    pub fn new(channel: DacChannel<'d, T, 1>) -> Self {
        let mut dac = Self { channel };
        dac.write(DacSample::default());
        dac
    }

    /// Write a single sample to the DAC
    pub fn write(&mut self, sample: DacSample) {
        self.channel.set(sample.as_dac_value());
    }
}
