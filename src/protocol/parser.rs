//! Byte-driven frame parser
//!
//! Consumes one byte at a time and never blocks; a frame may arrive split
//! across any number of UART reads. Anything unexpected drops the parser
//! back to [`ParseState::Idle`] and it resynchronizes on the next sync pair.

use super::frame::{Packet, Payload, MAX_PAYLOAD_LEN, SYNC0, SYNC1};

/// Parser position within a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParseState {
    /// Waiting for the first sync byte
    #[default]
    Idle,
    /// First sync byte seen
    Sync,
    /// Expecting the length high byte
    LengthHigh,
    /// Expecting the length low byte
    LengthLow,
    /// Expecting the opcode
    Opcode,
    /// Collecting payload bytes
    Data,
    /// Expecting the checksum
    Checksum,
}

/// Result of feeding one byte
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Frame still incomplete (or no frame in progress)
    Pending,
    /// A complete, valid packet with a non-zero opcode
    Packet(Packet),
    /// Frame complete but the checksum did not match
    ChecksumMismatch {
        /// Opcode of the rejected frame
        opcode: u8,
        /// Checksum computed over the received bytes
        expected: u8,
        /// Checksum byte on the wire
        received: u8,
    },
    /// Valid frame carrying opcode zero, which is never dispatched
    NullOpcode,
    /// Length field was zero or larger than the payload buffer
    Malformed(u16),
}

/// Incremental frame parser
#[derive(Clone, Debug, Default)]
pub struct FrameParser {
    state: ParseState,
    length: u16,
    remaining: u16,
    sum: u8,
    opcode: u8,
    payload: Payload,
}

impl FrameParser {
    /// Create a parser waiting for a sync pair
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ParseState::Idle,
            length: 0,
            remaining: 0,
            sum: 0,
            opcode: 0,
            payload: Payload::new(),
        }
    }

    /// Current parser state
    #[must_use]
    pub const fn state(&self) -> ParseState {
        self.state
    }

    /// Feed one byte
    pub fn feed(&mut self, byte: u8) -> ParseOutcome {
        match self.state {
            ParseState::Idle => {
                if byte == SYNC0 {
                    self.state = ParseState::Sync;
                }
            }
            ParseState::Sync => {
                self.state = if byte == SYNC1 {
                    ParseState::LengthHigh
                } else {
                    ParseState::Idle
                };
            }
            ParseState::LengthHigh => {
                self.length = u16::from(byte) << 8;
                self.sum = byte;
                self.state = ParseState::LengthLow;
            }
            ParseState::LengthLow => {
                self.length |= u16::from(byte);
                self.sum = self.sum.wrapping_add(byte);
                if self.length == 0 || usize::from(self.length - 1) > MAX_PAYLOAD_LEN {
                    let length = self.length;
                    self.reset();
                    return ParseOutcome::Malformed(length);
                }
                self.state = ParseState::Opcode;
            }
            ParseState::Opcode => {
                self.opcode = byte;
                self.sum = self.sum.wrapping_add(byte);
                self.payload.clear();
                self.remaining = self.length - 1;
                self.state = if self.remaining == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Data
                };
            }
            ParseState::Data => {
                // Capacity was checked against the length field
                let _ = self.payload.push(byte);
                self.sum = self.sum.wrapping_add(byte);
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = ParseState::Checksum;
                }
            }
            ParseState::Checksum => {
                let expected = self.sum.wrapping_neg();
                let opcode = self.opcode;
                self.state = ParseState::Idle;

                if byte != expected {
                    return ParseOutcome::ChecksumMismatch {
                        opcode,
                        expected,
                        received: byte,
                    };
                }
                if opcode == 0 {
                    return ParseOutcome::NullOpcode;
                }
                let payload = core::mem::take(&mut self.payload);
                return ParseOutcome::Packet(Packet::from_parts(opcode, payload));
            }
        }
        ParseOutcome::Pending
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.length = 0;
        self.remaining = 0;
        self.sum = 0;
        self.opcode = 0;
        self.payload.clear();
    }
}

/// Decode the first valid packet found in `bytes`
#[must_use]
pub fn decode(bytes: &[u8]) -> Option<Packet> {
    let mut parser = FrameParser::new();
    bytes.iter().find_map(|&byte| match parser.feed(byte) {
        ParseOutcome::Packet(packet) => Some(packet),
        _ => None,
    })
}
