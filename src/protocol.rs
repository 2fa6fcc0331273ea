//! Radio Link Protocol
//!
//! Binary framing between the controller and the Bluetooth handsfree
//! module, plus the typed messages carried inside the frames.
//!
//! ```text
//! [0x00][0xAA][len_hi][len_lo][opcode][payload...][checksum]
//!             └──── len = 1 + payload ────┘
//! checksum = -(len_hi + len_lo + opcode + Σpayload) mod 256
//! ```
//!
//! Inbound bytes go through [`parser::FrameParser`]; [`link::LinkEngine`]
//! wraps it with validation bookkeeping, automatic acknowledgements and
//! the outbound send path.

pub mod frame;
pub mod link;
pub mod message;
pub mod parser;

pub use frame::{encode, Frame, Packet, Payload, MAX_FRAME_LEN, MAX_PAYLOAD_LEN};
pub use link::{LinkEngine, LinkStats, LinkTx, PacketSink};
pub use message::{opcode, CallAction, Command, Inbound, LinkStatus};
pub use parser::{decode, FrameParser, ParseOutcome};
