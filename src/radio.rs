//! Radio Control Logic
//!
//! Connection and call handling against the handsfree radio module.
//! [`connection::RadioMachine`] runs on the 20 ms radio tick, consumes the
//! inbound packets the link engine dispatches and drives the line through
//! its command interface.

pub mod connection;
pub mod state;

pub use connection::RadioMachine;
pub use state::{CallState, RadioConnectionState};
