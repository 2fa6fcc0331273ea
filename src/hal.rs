//! Hardware Abstraction Layer
//!
//! The seams between the call-control core and the board. The core only
//! sees these traits; [`gpio::PinSlic`] implements the line interface over
//! `embedded-hal` pins and, on the target, [`adc`]/[`dac`] move line audio
//! in and out of the software codec.

pub mod gpio;

#[cfg(feature = "embedded")]
pub mod adc;
#[cfg(feature = "embedded")]
pub mod dac;

use crate::types::PairingIndex;

/// Subscriber line interface circuit (SLIC)
pub trait Slic {
    /// Raw, undebounced switch-hook reading (`true` = loop closed)
    fn is_off_hook(&mut self) -> bool;

    /// Reverse (or restore) line polarity
    fn set_polarity_reversed(&mut self, reversed: bool);

    /// Enter (or leave) the ringing bias mode
    fn set_ring_mode(&mut self, ringing: bool);
}

/// Tone synthesis and detection capability
///
/// Detector channels 0-3 are the DTMF rows, 4-6 the columns. Energies are
/// normalized so that a full-scale sine at the channel frequency reads 1.0.
pub trait AudioCapability {
    /// Energy measured at one detector channel over the last block
    fn tone_energy(&mut self, channel: usize) -> f32;

    /// Program one oscillator; amplitude 0 disables it
    fn set_oscillator(&mut self, index: usize, frequency: f32, amplitude: f32);
}

/// Non-volatile storage of the pairing index
pub trait ConfigStore {
    /// Stored index; may be out of range if the storage was never written
    fn read_pairing_index(&mut self) -> u8;

    /// Persist a new index
    fn write_pairing_index(&mut self, index: PairingIndex);
}

/// Pairing index kept in RAM only
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryConfigStore {
    index: u8,
    writes: u32,
}

impl MemoryConfigStore {
    /// Create a store holding `index`
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self { index, writes: 0 }
    }

    /// Number of writes performed
    #[must_use]
    pub const fn writes(&self) -> u32 {
        self.writes
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read_pairing_index(&mut self) -> u8 {
        self.index
    }

    fn write_pairing_index(&mut self, index: PairingIndex) {
        self.index = index.get();
        self.writes = self.writes.wrapping_add(1);
    }
}

impl<T: Slic + ?Sized> Slic for &mut T {
    fn is_off_hook(&mut self) -> bool {
        (**self).is_off_hook()
    }

    fn set_polarity_reversed(&mut self, reversed: bool) {
        (**self).set_polarity_reversed(reversed);
    }

    fn set_ring_mode(&mut self, ringing: bool) {
        (**self).set_ring_mode(ringing);
    }
}

impl<T: AudioCapability + ?Sized> AudioCapability for &mut T {
    fn tone_energy(&mut self, channel: usize) -> f32 {
        (**self).tone_energy(channel)
    }

    fn set_oscillator(&mut self, index: usize, frequency: f32, amplitude: f32) {
        (**self).set_oscillator(index, frequency, amplitude);
    }
}

impl<T: ConfigStore + ?Sized> ConfigStore for &mut T {
    fn read_pairing_index(&mut self) -> u8 {
        (**self).read_pairing_index()
    }

    fn write_pairing_index(&mut self, index: PairingIndex) {
        (**self).write_pairing_index(index);
    }
}
