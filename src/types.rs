//! Shared types used across the line bridge
//!
//! Domain types that enforce their invariants at construction, plus the
//! single-slot [`Latch`] used for every one-shot event between machines.

use core::fmt;

use crate::config::PAIRING_INDEX_MAX;
use crate::error::{Error, Result};

/// Index of the bonded radio peer to reconnect to (0-7)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PairingIndex(u8);

impl PairingIndex {
    /// Create a pairing index, rejecting values above 7
    ///
    /// # Errors
    ///
    /// Returns [`Error::PairingIndexOutOfRange`] for values above 7.
    pub const fn new(index: u8) -> Result<Self> {
        if index <= PAIRING_INDEX_MAX {
            Ok(Self(index))
        } else {
            Err(Error::PairingIndexOutOfRange(index))
        }
    }

    /// Raw index value
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PairingIndex {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index)
    }
}

impl fmt::Debug for PairingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PairingIndex({})", self.0)
    }
}

impl fmt::Display for PairingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PairingIndex {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.0);
    }
}

/// Debounced switch-hook position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HookState {
    /// Handset resting, loop open
    #[default]
    OnHook,
    /// Handset lifted, loop closed
    OffHook,
}

impl HookState {
    /// Build from a raw "loop closed" reading
    #[must_use]
    pub const fn from_off_hook(off_hook: bool) -> Self {
        if off_hook {
            Self::OffHook
        } else {
            Self::OnHook
        }
    }

    /// Check if the handset is lifted
    #[must_use]
    pub const fn is_off_hook(self) -> bool {
        matches!(self, Self::OffHook)
    }

    /// Short label for logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnHook => "on-hook",
            Self::OffHook => "off-hook",
        }
    }
}

impl fmt::Display for HookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for HookState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.label());
    }
}

/// A dialed digit: 0-9, 10 (`*`) or 11 (`#`)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    /// The `*` key
    pub const STAR: Self = Self(10);

    /// The `#` key
    pub const HASH: Self = Self(11);

    /// Create a digit from its normalized value
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 11 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Digit from a rotary pulse count (10 pulses dial `0`)
    #[must_use]
    pub const fn from_pulses(pulses: u8) -> Option<Self> {
        match pulses {
            1..=9 => Some(Self(pulses)),
            10 => Some(Self(0)),
            _ => None,
        }
    }

    /// Normalized value (0-11)
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// ASCII character sent to the radio module
    #[must_use]
    pub const fn as_ascii(self) -> u8 {
        match self.0 {
            10 => b'*',
            11 => b'#',
            d => b'0' + d,
        }
    }
}

impl fmt::Debug for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digit({})", char::from(self.as_ascii()))
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_ascii()))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Digit {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", char::from(self.as_ascii()));
    }
}

/// Single-slot, read-and-clear event latch
///
/// Posting overwrites any value not yet taken; only the newest event
/// survives until the consumer's next pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Latch<T: Copy> {
    slot: Option<T>,
}

impl<T: Copy> Latch<T> {
    /// Create an empty latch
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Post an event, replacing any pending one
    pub fn post(&mut self, value: T) {
        self.slot = Some(value);
    }

    /// Consume the pending event
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// Drop any pending event
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

impl<T: Copy> Default for Latch<T> {
    fn default() -> Self {
        Self::new()
    }
}
