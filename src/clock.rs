//! Millisecond clock and cooperative scheduling
//!
//! The firmware runs a single polling loop. Each state machine owns a
//! [`Periodic`] and is evaluated only when its period has elapsed. Time is
//! a free-running `u32` millisecond counter that wraps every ~49.7 days;
//! all deltas use wrapping subtraction so the wrap is invisible.

use core::fmt;

/// Timestamp from a free-running millisecond counter
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Millis(pub u32);

impl Millis {
    /// Counter value zero
    pub const ZERO: Self = Self(0);

    /// Create from a raw counter value
    #[must_use]
    pub const fn new(ms: u32) -> Self {
        Self(ms)
    }

    /// Truncate a 64-bit uptime to the wrapping counter
    #[must_use]
    pub const fn from_u64(ms: u64) -> Self {
        Self(ms as u32)
    }

    /// Raw counter value
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, across counter wraparound
    #[must_use]
    pub const fn since(self, earlier: Self) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Timestamp `ms` later, wrapping
    #[must_use]
    pub const fn add_ms(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }
}

impl fmt::Debug for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Millis({})", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Millis {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}ms", self.0);
    }
}

/// Periodic evaluation gate for one state machine
#[derive(Clone, Copy, Debug)]
pub struct Periodic {
    period_ms: u32,
    last: Millis,
}

impl Periodic {
    /// Create a gate whose first evaluation is due one period after `start`
    #[must_use]
    pub const fn new(period_ms: u32, start: Millis) -> Self {
        Self {
            period_ms,
            last: start,
        }
    }

    /// Period in milliseconds
    #[must_use]
    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Check whether the period has elapsed without consuming it
    #[must_use]
    pub const fn is_due(&self, now: Millis) -> bool {
        now.since(self.last) >= self.period_ms
    }

    /// Returns `true` once per elapsed period and re-arms from `now`
    ///
    /// A late poll does not trigger catch-up evaluations; the machine
    /// simply runs once and the next period starts from `now`.
    pub fn poll(&mut self, now: Millis) -> bool {
        if self.is_due(now) {
            self.last = now;
            true
        } else {
            false
        }
    }

    /// Re-arm from `now`
    pub fn reset(&mut self, now: Millis) {
        self.last = now;
    }
}
