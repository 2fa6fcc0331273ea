//! Dial decoder
//!
//! Decodes rotary pulse dialing from debounced hook breaks and DTMF from the
//! detector energies. Pulse and tone decoding share one state variable, so
//! only one of them can be in progress at a time.

use core::fmt;

use heapless::Vec;

use crate::config::{
    DTMF_DOMINANCE_RATIO, DTMF_DRIVEN_MS, DTMF_ENERGY_THRESHOLD, DTMF_SILENT_MS,
    INTER_DIGIT_MAKE_MS, LINE_TICK_MS, MAX_DIAL_DIGITS, PULSE_BREAK_MAX_MS,
};
use crate::hal::AudioCapability;
use crate::types::{Digit, HookState};

/// Standard DTMF keypad, indexed `[row][column]`
const KEYPAD: [[u8; 3]; 4] = [[1, 2, 3], [4, 5, 6], [7, 8, 9], [10, 0, 11]];

/// Number of row detector channels; columns follow
const ROW_CHANNELS: usize = 4;

/// Dial decoder position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DialState {
    /// No digit in progress
    #[default]
    Idle,
    /// Rotary break (loop open) in progress
    Break,
    /// Rotary make between pulses
    Make,
    /// DTMF tone present
    DtmfOn,
    /// DTMF tone gone, waiting out the silence
    DtmfOff,
}

impl DialState {
    /// Short label for logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Break => "Break",
            Self::Make => "Make",
            Self::DtmfOn => "DtmfOn",
            Self::DtmfOff => "DtmfOff",
        }
    }
}

impl fmt::Display for DialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DialState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.label());
    }
}

/// Index of the single dominant channel, if any
fn dominant(energies: &[f32]) -> Option<usize> {
    let (best, peak) = energies
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::MIN), |acc, (i, e)| if e > acc.1 { (i, e) } else { acc });

    if peak < DTMF_ENERGY_THRESHOLD {
        return None;
    }
    let clear = energies
        .iter()
        .enumerate()
        .all(|(i, &e)| i == best || e * DTMF_DOMINANCE_RATIO <= peak);
    clear.then_some(best)
}

/// Read the seven detector channels and resolve a DTMF key
pub fn detect_dtmf<A: AudioCapability>(audio: &mut A) -> Option<Digit> {
    let rows: [f32; 4] = core::array::from_fn(|i| audio.tone_energy(i));
    let cols: [f32; 3] = core::array::from_fn(|i| audio.tone_energy(ROW_CHANNELS + i));

    let row = dominant(&rows)?;
    let col = dominant(&cols)?;
    Digit::new(KEYPAD[row][col])
}

/// Rotary and DTMF digit decoder
#[derive(Clone, Debug, Default)]
pub struct DialDecoder {
    state: DialState,
    timer_ms: u32,
    pulses: u8,
    tone: Option<Digit>,
    dialed: Vec<Digit, MAX_DIAL_DIGITS>,
}

impl DialDecoder {
    /// Create an idle decoder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DialState::Idle,
            timer_ms: 0,
            pulses: 0,
            tone: None,
            dialed: Vec::new(),
        }
    }

    /// Decoder position
    #[must_use]
    pub const fn state(&self) -> DialState {
        self.state
    }

    /// Digits decoded since the handset was lifted
    #[must_use]
    pub fn dialed(&self) -> &[Digit] {
        &self.dialed
    }

    /// Advance one line tick; returns a digit when one completes
    ///
    /// `line_off_hook` is true while the line state machine sits in
    /// `OffHook`, the only state a new digit may start from. `line_on_hook`
    /// is true once a hang-up has been confirmed.
    pub fn tick(
        &mut self,
        hook: HookState,
        line_off_hook: bool,
        line_on_hook: bool,
        detected: Option<Digit>,
    ) -> Option<Digit> {
        if line_on_hook {
            self.dialed.clear();
        }

        match self.state {
            DialState::Idle => {
                if !line_off_hook {
                    return None;
                }
                if !hook.is_off_hook() {
                    self.start_break();
                    self.pulses = 0;
                } else if let Some(digit) = detected {
                    self.enter(DialState::DtmfOn);
                    self.tone = Some(digit);
                    self.timer_ms = LINE_TICK_MS;
                }
                None
            }
            DialState::Break => {
                if hook.is_off_hook() {
                    self.pulses += 1;
                    self.enter(DialState::Make);
                } else {
                    self.timer_ms += LINE_TICK_MS;
                    if self.timer_ms >= PULSE_BREAK_MAX_MS {
                        // Too long for a pulse: hang-up or flash
                        self.abort();
                    }
                }
                None
            }
            DialState::Make => {
                if !hook.is_off_hook() {
                    if usize::from(self.pulses) >= MAX_DIAL_DIGITS {
                        self.abort();
                    } else {
                        self.start_break();
                    }
                    return None;
                }
                self.timer_ms += LINE_TICK_MS;
                if self.timer_ms < INTER_DIGIT_MAKE_MS {
                    return None;
                }
                let digit = Digit::from_pulses(self.pulses);
                self.abort();
                digit.map(|d| self.finish(d))
            }
            DialState::DtmfOn => {
                if !hook.is_off_hook() {
                    self.abort();
                    return None;
                }
                match detected {
                    Some(digit) if Some(digit) == self.tone => {
                        self.timer_ms += LINE_TICK_MS;
                    }
                    Some(_) => self.abort(),
                    None if self.timer_ms >= DTMF_DRIVEN_MS => {
                        self.state = DialState::DtmfOff;
                        self.timer_ms = LINE_TICK_MS;
                    }
                    None => self.abort(),
                }
                None
            }
            DialState::DtmfOff => {
                if !hook.is_off_hook() {
                    self.abort();
                    return None;
                }
                match detected {
                    None => {
                        self.timer_ms += LINE_TICK_MS;
                        if self.timer_ms < DTMF_SILENT_MS {
                            return None;
                        }
                        let digit = self.tone;
                        self.abort();
                        digit.map(|d| self.finish(d))
                    }
                    Some(digit) if Some(digit) == self.tone => {
                        // Dropout inside one key press
                        self.state = DialState::DtmfOn;
                        self.timer_ms = DTMF_DRIVEN_MS;
                        None
                    }
                    Some(_) => {
                        self.abort();
                        None
                    }
                }
            }
        }
    }

    fn enter(&mut self, state: DialState) {
        self.state = state;
        self.timer_ms = 0;
    }

    // The tick that saw the break counts toward its length
    fn start_break(&mut self) {
        self.state = DialState::Break;
        self.timer_ms = LINE_TICK_MS;
    }

    /// Drop any digit in progress
    pub fn abort(&mut self) {
        self.state = DialState::Idle;
        self.timer_ms = 0;
        self.pulses = 0;
        self.tone = None;
    }

    fn finish(&mut self, digit: Digit) -> Digit {
        if self.dialed.push(digit).is_err() || self.dialed.is_full() {
            self.dialed.clear();
        }
        digit
    }
}
