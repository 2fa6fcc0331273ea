//! ADC Driver
//!
//! Samples the line audio input for the DTMF detectors.

use embassy_stm32::adc::{Adc, AdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;

/// ADC reading result
#[derive(Clone, Copy, Debug)]
pub struct AdcReading {
    /// Raw 12-bit ADC value (0-4095)
    raw: u16,
}

impl AdcReading {
    /// Create a new ADC reading from raw value
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    /// Get the raw 12-bit value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Convert to signed audio sample (-1.0 to 1.0)
    #[must_use]
    pub fn as_audio_sample(self) -> f32 {
        (f32::from(self.raw) / 2047.5) - 1.0
    }
}

impl defmt::Format for AdcReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ADC({})", self.raw);
    }
}

/// Line audio input
pub struct AudioAdc<'d> {
    adc: Adc<'d, ADC1>,
}

impl AudioAdc<'_> {
    /// Create a new audio ADC driver
    #[must_use]
    pub fn new(adc: ADC1) -> Self {
        let mut adc = Adc::new(adc);
        adc.set_sample_time(SampleTime::CYCLES247_5);
        Self { adc }
    }

    /// Read one line audio sample
    pub fn read<T: AdcChannel<ADC1>>(&mut self, channel: &mut T) -> AdcReading {
        let raw = self.adc.blocking_read(channel);
        AdcReading::from_raw(raw)
    }
}
