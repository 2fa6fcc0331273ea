//! Ring generator
//!
//! Produces the ring cadence by toggling line polarity at the ring
//! frequency during each burst: 1 s of 25 Hz ringing, 3 s of silence,
//! repeated until stopped or the handset is lifted.

use core::fmt;

use crate::config::{LINE_TICK_MS, RING_HALF_PERIOD_MS, RING_OFF_MS, RING_ON_MS};
use crate::hal::Slic;
use crate::types::HookState;

/// Ring cadence position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RingState {
    /// Not ringing
    #[default]
    Idle,
    /// Burst, polarity reversed
    PulseOn,
    /// Burst, polarity normal
    PulseOff,
    /// Silent gap between bursts
    Between,
}

impl RingState {
    /// Short label for logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::PulseOn => "PulseOn",
            Self::PulseOff => "PulseOff",
            Self::Between => "Between",
        }
    }
}

impl fmt::Display for RingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RingState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.label());
    }
}

/// Ring cadence generator
#[derive(Clone, Copy, Debug, Default)]
pub struct RingGenerator {
    state: RingState,
    /// Time into the current burst or gap
    phase_ms: u32,
    /// Time into the current half cycle of the burst
    half_ms: u32,
}

impl RingGenerator {
    /// Create an idle generator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: RingState::Idle,
            phase_ms: 0,
            half_ms: 0,
        }
    }

    /// Cadence position
    #[must_use]
    pub const fn state(&self) -> RingState {
        self.state
    }

    /// Check if the generator is driving the line
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, RingState::Idle)
    }

    /// Advance one line tick
    ///
    /// `requested` is the radio's ring command; `line_on_hook` tells whether
    /// the line state machine is resting on-hook, which is the only state a
    /// new ring may start from.
    pub fn tick<S: Slic>(
        &mut self,
        requested: bool,
        hook: HookState,
        line_on_hook: bool,
        slic: &mut S,
    ) {
        if self.is_active() {
            if hook.is_off_hook() || !requested {
                self.stop(slic);
            } else {
                self.advance(slic);
            }
        } else if requested && line_on_hook && !hook.is_off_hook() {
            debug!("Ring: start");
            slic.set_ring_mode(true);
            self.start_burst(slic);
        }
    }

    fn advance<S: Slic>(&mut self, slic: &mut S) {
        self.phase_ms += LINE_TICK_MS;
        match self.state {
            RingState::PulseOn | RingState::PulseOff => {
                self.half_ms += LINE_TICK_MS;
                if self.phase_ms >= RING_ON_MS {
                    self.state = RingState::Between;
                    self.phase_ms = 0;
                    slic.set_polarity_reversed(false);
                } else if self.half_ms >= RING_HALF_PERIOD_MS {
                    self.half_ms = 0;
                    self.state = if self.state == RingState::PulseOn {
                        RingState::PulseOff
                    } else {
                        RingState::PulseOn
                    };
                    slic.set_polarity_reversed(self.state == RingState::PulseOn);
                }
            }
            RingState::Between => {
                if self.phase_ms >= RING_OFF_MS {
                    self.start_burst(slic);
                }
            }
            RingState::Idle => {}
        }
    }

    fn start_burst<S: Slic>(&mut self, slic: &mut S) {
        self.state = RingState::PulseOn;
        self.phase_ms = 0;
        self.half_ms = 0;
        slic.set_polarity_reversed(true);
    }

    /// Stop ringing and restore normal line polarity
    pub fn stop<S: Slic>(&mut self, slic: &mut S) {
        if self.is_active() {
            debug!("Ring: stop");
        }
        self.state = RingState::Idle;
        self.phase_ms = 0;
        self.half_ms = 0;
        slic.set_polarity_reversed(false);
        slic.set_ring_mode(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Outputs {
        reversed: bool,
        ring_mode: bool,
        flips: u32,
    }

    impl Slic for Outputs {
        fn is_off_hook(&mut self) -> bool {
            false
        }

        fn set_polarity_reversed(&mut self, reversed: bool) {
            if reversed != self.reversed {
                self.flips += 1;
            }
            self.reversed = reversed;
        }

        fn set_ring_mode(&mut self, ringing: bool) {
            self.ring_mode = ringing;
        }
    }

    #[test]
    fn does_not_start_unless_line_on_hook() {
        let mut ring = RingGenerator::new();
        let mut slic = Outputs::default();
        ring.tick(true, HookState::OnHook, false, &mut slic);
        assert_eq!(ring.state(), RingState::Idle);
        ring.tick(true, HookState::OffHook, true, &mut slic);
        assert_eq!(ring.state(), RingState::Idle);
    }

    #[test]
    fn burst_then_gap() {
        let mut ring = RingGenerator::new();
        let mut slic = Outputs::default();
        ring.tick(true, HookState::OnHook, true, &mut slic);
        assert_eq!(ring.state(), RingState::PulseOn);
        assert!(slic.ring_mode && slic.reversed);

        // 20 ms per half cycle
        ring.tick(true, HookState::OnHook, false, &mut slic);
        assert_eq!(ring.state(), RingState::PulseOn);
        ring.tick(true, HookState::OnHook, false, &mut slic);
        assert_eq!(ring.state(), RingState::PulseOff);
        assert!(!slic.reversed);

        for _ in 2..100 {
            ring.tick(true, HookState::OnHook, false, &mut slic);
        }
        assert_eq!(ring.state(), RingState::Between);
        assert!(!slic.reversed);
        assert!(slic.ring_mode);

        for _ in 0..299 {
            ring.tick(true, HookState::OnHook, false, &mut slic);
        }
        assert_eq!(ring.state(), RingState::Between);
        ring.tick(true, HookState::OnHook, false, &mut slic);
        assert_eq!(ring.state(), RingState::PulseOn);
    }

    #[test]
    fn off_hook_cancels_mid_burst() {
        let mut ring = RingGenerator::new();
        let mut slic = Outputs::default();
        ring.tick(true, HookState::OnHook, true, &mut slic);
        ring.tick(true, HookState::OffHook, false, &mut slic);
        assert_eq!(ring.state(), RingState::Idle);
        assert!(!slic.reversed);
        assert!(!slic.ring_mode);
    }

    #[test]
    fn release_stops_on_next_tick() {
        let mut ring = RingGenerator::new();
        let mut slic = Outputs::default();
        ring.tick(true, HookState::OnHook, true, &mut slic);
        ring.tick(false, HookState::OnHook, false, &mut slic);
        assert!(!ring.is_active());
        assert!(!slic.ring_mode);
    }
}
