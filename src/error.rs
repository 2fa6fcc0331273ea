//! Error types
//!
//! The state machines themselves never fail; errors only come from the
//! edges (serial writes, configuration input, capability indices).

use thiserror::Error;

/// Errors surfaced by the line bridge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Pairing index outside `0..=7`
    #[error("pairing index {0} out of range (0-7)")]
    PairingIndexOutOfRange(u8),

    /// Payload does not fit in a single frame
    #[error("payload of {0} bytes exceeds frame capacity")]
    PayloadTooLong(usize),

    /// Raw packet without an opcode byte
    #[error("raw packet is empty")]
    EmptyPacket,

    /// Writing to the radio module UART failed
    #[error("serial write failed: {0:?}")]
    Serial(embedded_io::ErrorKind),

    /// Oscillator index outside the tone bank
    #[error("oscillator {0} does not exist")]
    OscillatorOutOfRange(usize),

    /// Detector channel outside the detector bank
    #[error("tone detector channel {0} does not exist")]
    DetectorOutOfRange(usize),
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::PairingIndexOutOfRange(index) => defmt::write!(f, "PairingIndex({})", index),
            Self::PayloadTooLong(len) => defmt::write!(f, "PayloadTooLong({})", len),
            Self::EmptyPacket => defmt::write!(f, "EmptyPacket"),
            Self::Serial(kind) => defmt::write!(f, "Serial({})", kind),
            Self::OscillatorOutOfRange(i) => defmt::write!(f, "Oscillator({})", i),
            Self::DetectorOutOfRange(i) => defmt::write!(f, "Detector({})", i),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, Error>;
