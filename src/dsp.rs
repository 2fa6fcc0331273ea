//! Digital Signal Processing
//!
//! Software tone path for boards without a dedicated tone codec:
//! - Sine oscillators summed into the line output (call-progress tones)
//! - Goertzel detectors on the line input (DTMF rows and columns)
//! - [`codec::SoftwareCodec`] tying both behind the `AudioCapability` seam

pub mod codec;
pub mod goertzel;
pub mod oscillator;

pub use codec::SoftwareCodec;
pub use goertzel::{DetectorBank, Goertzel};
pub use oscillator::{SineOscillator, ToneBank};
