//! Typed messages carried by link frames
//!
//! Inbound frames are decoded into [`Inbound`]; everything the controller
//! sends is a [`Command`] turned into a [`Packet`] right before framing.

use heapless::{String, Vec};

use super::frame::{Packet, Payload};
use crate::config::MAX_DIAL_DIGITS;
use crate::radio::state::CallState;
use crate::types::PairingIndex;

/// Opcode assignments
pub mod opcode {
    //! Opcodes understood by the radio module firmware

    /// Link/connection status (inbound)
    pub const LINK_STATUS: u8 = 0x01;
    /// Call control (outbound) and call status (inbound)
    pub const CALL: u8 = 0x02;
    /// Caller ID text (inbound)
    pub const CALLER_ID: u8 = 0x03;
    /// Dial a number (outbound)
    pub const DIAL_NUMBER: u8 = 0x04;
    /// Generic event acknowledgement (outbound)
    pub const EVENT_ACK: u8 = 0x14;
    /// Enter pairing mode (outbound)
    pub const PAIRING_ENABLE: u8 = 0x16;
    /// Connect to a paired device (outbound)
    pub const LINK_CONNECT: u8 = 0x17;
    /// Set speaker gain (outbound)
    pub const SPEAKER_GAIN: u8 = 0x1B;
}

/// Device index byte leading call-control and gain payloads
const DEVICE_INDEX: u8 = 0x00;

/// Longest caller ID string kept
pub const CALLER_ID_LEN: usize = 32;

/// Caller ID text
pub type CallerId = String<CALLER_ID_LEN>;

/// ASCII digits of a number to dial
pub type DialString = Vec<u8, MAX_DIAL_DIGITS>;

/// Action byte of an outbound call-control frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallAction {
    /// Answer the incoming call
    Accept,
    /// Hang up / reject
    Drop,
    /// Start the phone's voice assistant
    VoiceDial,
    /// Raise the call audio gain
    Gain,
}

impl CallAction {
    /// Wire code
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Accept => 0x04,
            Self::Drop => 0x05,
            Self::VoiceDial => 0x0A,
            Self::Gain => 0x5D,
        }
    }

    /// Short label for logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Drop => "drop",
            Self::VoiceDial => "voice-dial",
            Self::Gain => "gain",
        }
    }
}

/// Decoded link status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LinkStatus {
    /// Handsfree service link is up
    pub connected: bool,
    /// Audio (SCO) link is up
    pub audio: bool,
}

impl LinkStatus {
    /// Decode the status byte
    #[must_use]
    pub const fn from_byte(status: u8) -> Self {
        Self {
            connected: status & 0x01 != 0,
            audio: status & 0x02 != 0,
        }
    }
}

/// Message received from the radio module
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    /// Link status changed
    LinkStatus(LinkStatus),
    /// Call status changed
    CallStatus(CallState),
    /// Caller ID for the current incoming call
    CallerId(CallerId),
    /// Opcode the controller does not act on
    Other(u8),
}

impl Inbound {
    /// Decode a packet; `None` if the payload is malformed for its opcode
    #[must_use]
    pub fn parse(packet: &Packet) -> Option<Self> {
        let payload = packet.payload();
        match packet.opcode() {
            opcode::LINK_STATUS => payload
                .first()
                .map(|&status| Self::LinkStatus(LinkStatus::from_byte(status))),
            // Status code is the last byte: `[device, status]` or `[status]`
            opcode::CALL => payload
                .last()
                .and_then(|&code| CallState::from_code(code))
                .map(Self::CallStatus),
            opcode::CALLER_ID => {
                let mut text = CallerId::new();
                for &b in payload {
                    if !(b.is_ascii_graphic() || b == b' ') {
                        continue;
                    }
                    if text.push(char::from(b)).is_err() {
                        break;
                    }
                }
                Some(Self::CallerId(text))
            }
            other => Some(Self::Other(other)),
        }
    }
}

/// Message sent to the radio module
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Acknowledge a received frame by its opcode
    Acknowledge(u8),
    /// Call control action
    CallControl(CallAction),
    /// Dial the given ASCII digits
    DialNumber(DialString),
    /// Make the module discoverable for pairing
    PairingEnable,
    /// Connect to the paired device at this index
    Connect(PairingIndex),
    /// Set speaker gain
    SpeakerGain(u8),
}

impl Command {
    /// Opcode this command is sent with
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        match self {
            Self::Acknowledge(_) => opcode::EVENT_ACK,
            Self::CallControl(_) => opcode::CALL,
            Self::DialNumber(_) => opcode::DIAL_NUMBER,
            Self::PairingEnable => opcode::PAIRING_ENABLE,
            Self::Connect(_) => opcode::LINK_CONNECT,
            Self::SpeakerGain(_) => opcode::SPEAKER_GAIN,
        }
    }

    /// Build the packet for this command
    #[must_use]
    pub fn to_packet(&self) -> Packet {
        let mut payload = Payload::new();
        // Every command payload is at most MAX_DIAL_DIGITS bytes long
        let _ = match self {
            Self::Acknowledge(acked) => payload.push(*acked).map_err(drop),
            Self::CallControl(action) => payload.extend_from_slice(&[DEVICE_INDEX, action.code()]),
            Self::DialNumber(digits) => payload.extend_from_slice(digits),
            Self::PairingEnable => Ok(()),
            Self::Connect(index) => payload.push(index.get()).map_err(drop),
            Self::SpeakerGain(level) => payload.extend_from_slice(&[DEVICE_INDEX, *level]),
        };
        Packet::from_parts(self.opcode(), payload)
    }
}
