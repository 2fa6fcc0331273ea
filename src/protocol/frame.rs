//! Frame layout, checksum and encoding

use core::fmt;

use heapless::Vec;

use crate::error::{Error, Result};

/// First sync byte
pub const SYNC0: u8 = 0x00;

/// Second sync byte
pub const SYNC1: u8 = 0xAA;

/// Largest payload a frame may carry
pub const MAX_PAYLOAD_LEN: usize = 128;

/// Sync (2) + length (2) + opcode (1) + checksum (1)
pub const FRAME_OVERHEAD: usize = 6;

/// Largest encoded frame
pub const MAX_FRAME_LEN: usize = MAX_PAYLOAD_LEN + FRAME_OVERHEAD;

/// Bounded payload buffer
pub type Payload = Vec<u8, MAX_PAYLOAD_LEN>;

/// Bounded encoded frame
pub type Frame = Vec<u8, MAX_FRAME_LEN>;

/// Two's complement of the byte sum, so that all covered bytes plus the
/// checksum add up to zero
#[must_use]
pub fn checksum<I: IntoIterator<Item = u8>>(bytes: I) -> u8 {
    bytes
        .into_iter()
        .fold(0u8, u8::wrapping_add)
        .wrapping_neg()
}

/// A validated opcode + payload pair
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    opcode: u8,
    payload: Payload,
}

impl Packet {
    /// Create a packet, copying the payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLong`] if the payload exceeds
    /// [`MAX_PAYLOAD_LEN`].
    pub fn new(opcode: u8, payload: &[u8]) -> Result<Self> {
        let payload = Payload::from_slice(payload).map_err(|()| Error::PayloadTooLong(payload.len()))?;
        Ok(Self { opcode, payload })
    }

    /// Create a packet from an already bounded payload
    #[must_use]
    pub const fn from_parts(opcode: u8, payload: Payload) -> Self {
        Self { opcode, payload }
    }

    /// Interpret raw bytes as `[opcode, payload...]`
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPacket`] for an empty slice and
    /// [`Error::PayloadTooLong`] if the payload part does not fit.
    pub fn from_raw(bytes: &[u8]) -> Result<Self> {
        match bytes.split_first() {
            Some((&opcode, payload)) => Self::new(opcode, payload),
            None => Err(Error::EmptyPacket),
        }
    }

    /// Opcode byte
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Payload bytes
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Value of the length field (opcode + payload)
    #[must_use]
    pub fn length_field(&self) -> u16 {
        // MAX_PAYLOAD_LEN keeps this far below u16::MAX
        (self.payload.len() + 1) as u16
    }

    /// Encode into a complete frame
    #[must_use]
    pub fn encode(&self) -> Frame {
        let [len_hi, len_lo] = self.length_field().to_be_bytes();
        let sum = checksum(
            [len_hi, len_lo, self.opcode]
                .into_iter()
                .chain(self.payload.iter().copied()),
        );

        let mut frame = Frame::new();
        // Capacity is MAX_PAYLOAD_LEN + FRAME_OVERHEAD, so none of these can fail
        let _ = frame.extend_from_slice(&[SYNC0, SYNC1, len_hi, len_lo, self.opcode]);
        let _ = frame.extend_from_slice(&self.payload);
        let _ = frame.push(sum);
        frame
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packet(op={:#04x}, {:02x?})", self.opcode, self.payload.as_slice())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Packet {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Packet(op={=u8:#x}, {=[u8]:x})", self.opcode, self.payload.as_slice());
    }
}

/// Encode an opcode and payload into a frame
///
/// # Errors
///
/// Returns [`Error::PayloadTooLong`] if the payload exceeds
/// [`MAX_PAYLOAD_LEN`].
pub fn encode(opcode: u8, payload: &[u8]) -> Result<Frame> {
    Packet::new(opcode, payload).map(|packet| packet.encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_control_vector() {
        let frame = encode(0x02, &[0x00, 0x5D]).unwrap();
        assert_eq!(frame.as_slice(), &[0x00, 0xAA, 0x00, 0x03, 0x02, 0x00, 0x5D, 0x9E]);
    }

    #[test]
    fn checksum_sums_to_zero() {
        let frame = encode(0x17, &[0x03]).unwrap();
        let total = frame[2..].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        assert_eq!(total, 0);
    }

    #[test]
    fn payload_too_long() {
        let big = [0u8; MAX_PAYLOAD_LEN + 1];
        assert_eq!(encode(0x03, &big), Err(Error::PayloadTooLong(MAX_PAYLOAD_LEN + 1)));
    }

    #[test]
    fn raw_packet_split() {
        let packet = Packet::from_raw(&[0x1B, 0x00, 0x0F]).unwrap();
        assert_eq!(packet.opcode(), 0x1B);
        assert_eq!(packet.payload(), &[0x00, 0x0F]);
        assert_eq!(Packet::from_raw(&[]), Err(Error::EmptyPacket));
    }
}
