//! Handsfree Line Bridge Firmware Library
//!
//! Bridges an analog telephone line (rotary or DTMF handset behind a SLIC)
//! to a Bluetooth handsfree radio module on a UART. Lift the handset to get
//! dial tone, dial a number and the call is placed on the paired phone;
//! incoming calls ring the handset.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CONTROLLER                            │
//! │        scheduler pass  │  console / diagnostics              │
//! ├─────────────────────────────────────────────────────────────┤
//! │   RADIO (20 ms tick)         │   LINE (10 ms tick)           │
//! │   connection / call FSM      │   hook │ ring │ dial │ tone   │
//! ├─────────────────────────────────────────────────────────────┤
//! │   PROTOCOL                   │   DSP                         │
//! │   framing │ link engine      │   oscillators │ Goertzel      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 HAL (Slic, AudioCapability, ConfigStore)     │
//! │           embassy-rs on target, mocks on the host            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Type-driven design**: Custom types enforce invariants at construction
//! - **No unsafe in application code**
//! - **Functional core, imperative shell**: State machines see the board
//!   only through the HAL traits
//! - **Explicit error handling**: All fallible operations return `Result`
//! - **Bounded memory**: `heapless` containers, no allocation

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must come first so the logging macros are visible to every module
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Traits the core is written against, plus target drivers.
pub mod hal;

/// Digital Signal Processing
///
/// Software tone generation and DTMF detection.
pub mod dsp;

/// Radio Control Logic
///
/// Connection and call state machine.
pub mod radio;

/// Analog Line Control
///
/// Hook, ring, dial and tone state machines.
pub mod line;

/// Radio Link Protocol
///
/// Framing, parsing and typed messages.
pub mod protocol;

/// Scheduler and console entry points
pub mod controller;

/// Millisecond time base
pub mod clock;

/// Error types
pub mod error;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

pub use controller::{Controller, Status};
pub use error::{Error, Result};

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::clock::Millis;
    pub use crate::config::*;
    pub use crate::controller::Controller;
    pub use crate::hal::{AudioCapability, ConfigStore, MemoryConfigStore, Slic};
    pub use crate::types::*;

    // Embassy
    pub use embassy_time::{Duration, Instant, Ticker, Timer};

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
