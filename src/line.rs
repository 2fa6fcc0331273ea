//! Analog Line Control
//!
//! The line state machine and its four sub-machines, all evaluated on the
//! 10 ms line tick in a fixed order:
//!
//! ```text
//! hook debounce ─► ring generator ─► dial decoder ─► tone generator ─► line state
//! ```
//!
//! The radio machine talks to the line only through the commands
//! (`set_in_service`, `set_ring`, `set_in_call`) and the two single-slot
//! events (hook changed, digit dialed) on [`LineMachine`].

pub mod dial;
pub mod hook;
mod machine;
pub mod ring;
pub mod tone;

pub use dial::{DialDecoder, DialState};
pub use hook::HookDebouncer;
pub use machine::{LineMachine, LineState};
pub use ring::{RingGenerator, RingState};
pub use tone::{ToneGenerator, ToneInputs, ToneState};
