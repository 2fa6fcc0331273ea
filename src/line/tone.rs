//! Call-progress tone generator
//!
//! Selects between dial tone, the no-service cadence and the off-hook
//! warning, and programs all four oscillators on every transition.

use core::fmt;

use crate::config::{
    ToneTable, DIAL_TONE_TIMEOUT_MS, LINE_TICK_MS, NO_SERVICE_OFF_MS, NO_SERVICE_ON_MS,
    OFF_HOOK_OFF_MS, OFF_HOOK_ON_MS, OFF_HOOK_WARNING_DELAY_MS, TONE_DIAL, TONE_NO_SERVICE,
    TONE_OFF_HOOK, TONE_SILENT,
};
use crate::hal::AudioCapability;

/// Tone generator state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToneState {
    /// Line on-hook, nothing to play
    #[default]
    Idle,
    /// Off-hook, deliberately silent (dialing or in a call)
    Off,
    /// Dial tone
    Dial,
    /// No-service cadence, tone on
    NoServiceOn,
    /// No-service cadence, tone off
    NoServiceOff,
    /// Off-hook warning, tone on
    OffHookOn,
    /// Off-hook warning, tone off
    OffHookOff,
}

impl ToneState {
    /// Short label for logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Off => "Off",
            Self::Dial => "Dial",
            Self::NoServiceOn => "NoServiceOn",
            Self::NoServiceOff => "NoServiceOff",
            Self::OffHookOn => "OffHookOn",
            Self::OffHookOff => "OffHookOff",
        }
    }

    /// Oscillator program for this state
    #[must_use]
    pub const fn table(self) -> &'static ToneTable {
        match self {
            Self::Dial => &TONE_DIAL,
            Self::NoServiceOn => &TONE_NO_SERVICE,
            Self::OffHookOn => &TONE_OFF_HOOK,
            Self::Idle | Self::Off | Self::NoServiceOff | Self::OffHookOff => &TONE_SILENT,
        }
    }
}

impl fmt::Display for ToneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ToneState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.label());
    }
}

/// Conditions the tone generator reacts to on one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToneInputs {
    /// Line is engaged (off-hook, or on-hook but not yet confirmed)
    pub off_hook: bool,
    /// Radio link is up
    pub in_service: bool,
    /// A call is connected
    pub in_call: bool,
    /// A digit completed this tick
    pub digit: bool,
    /// The handset just answered a ring
    pub answered: bool,
}

/// Call-progress tone generator
#[derive(Clone, Copy, Debug, Default)]
pub struct ToneGenerator {
    state: ToneState,
    timer_ms: u32,
}

impl ToneGenerator {
    /// Create an idle generator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ToneState::Idle,
            timer_ms: 0,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> ToneState {
        self.state
    }

    /// Silence all oscillators and return to idle
    pub fn reset<A: AudioCapability>(&mut self, audio: &mut A) {
        self.state = ToneState::Idle;
        self.timer_ms = 0;
        program(audio, &TONE_SILENT);
    }

    /// Advance one line tick
    pub fn tick<A: AudioCapability>(&mut self, inputs: ToneInputs, audio: &mut A) {
        self.timer_ms = self.timer_ms.saturating_add(LINE_TICK_MS);
        let next = self.next_state(inputs);
        if next != self.state {
            debug!("Tone: {} -> {}", self.state.label(), next.label());
            self.state = next;
            self.timer_ms = 0;
            program(audio, next.table());
        }
    }

    fn next_state(&mut self, inputs: ToneInputs) -> ToneState {
        if !inputs.off_hook {
            return ToneState::Idle;
        }
        let elapsed = self.timer_ms;
        match self.state {
            ToneState::Idle => {
                if inputs.in_call || inputs.answered {
                    ToneState::Off
                } else if !inputs.in_service {
                    ToneState::NoServiceOn
                } else {
                    ToneState::Dial
                }
            }
            ToneState::Dial => {
                if inputs.digit || inputs.in_call {
                    ToneState::Off
                } else if !inputs.in_service {
                    ToneState::NoServiceOn
                } else if elapsed >= DIAL_TONE_TIMEOUT_MS {
                    ToneState::OffHookOn
                } else {
                    ToneState::Dial
                }
            }
            ToneState::Off => {
                if inputs.digit || inputs.in_call {
                    self.timer_ms = 0;
                    ToneState::Off
                } else if !inputs.in_service {
                    ToneState::NoServiceOn
                } else if elapsed >= OFF_HOOK_WARNING_DELAY_MS {
                    ToneState::OffHookOn
                } else {
                    ToneState::Off
                }
            }
            // Only going back on-hook ends the no-service cadence
            ToneState::NoServiceOn if elapsed >= NO_SERVICE_ON_MS => ToneState::NoServiceOff,
            ToneState::NoServiceOff if elapsed >= NO_SERVICE_OFF_MS => ToneState::NoServiceOn,
            ToneState::NoServiceOn | ToneState::NoServiceOff => self.state,
            ToneState::OffHookOn | ToneState::OffHookOff if inputs.digit || inputs.in_call => {
                ToneState::Off
            }
            ToneState::OffHookOn if elapsed >= OFF_HOOK_ON_MS => ToneState::OffHookOff,
            ToneState::OffHookOff if elapsed >= OFF_HOOK_OFF_MS => ToneState::OffHookOn,
            ToneState::OffHookOn | ToneState::OffHookOff => self.state,
        }
    }
}

fn program<A: AudioCapability>(audio: &mut A, table: &ToneTable) {
    for (index, source) in table.iter().enumerate() {
        audio.set_oscillator(index, source.frequency, source.amplitude);
    }
}
