//! Line state machine
//!
//! Top of the line side: owns the four sub-machines, evaluates them in
//! order on each tick and publishes hook and digit events to the radio
//! machine.

use core::fmt;

use crate::config::{HANGUP_CONFIRM_MS, LINE_TICK_MS};
use crate::hal::{AudioCapability, Slic};
use crate::types::{Digit, HookState, Latch};

use super::dial::{detect_dtmf, DialDecoder, DialState};
use super::hook::HookDebouncer;
use super::ring::{RingGenerator, RingState};
use super::tone::{ToneGenerator, ToneInputs, ToneState};

/// Line state as seen by the rest of the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineState {
    /// Handset resting
    #[default]
    OnHook,
    /// Handset lifted
    OffHook,
    /// Loop opened; may be a dial pulse or a hang-up
    OnHookProvisional,
    /// Ring generator driving the line
    Ringing,
}

impl LineState {
    /// Short label for logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnHook => "OnHook",
            Self::OffHook => "OffHook",
            Self::OnHookProvisional => "OnHookProvisional",
            Self::Ringing => "Ringing",
        }
    }
}

impl fmt::Display for LineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LineState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.label());
    }
}

/// Analog line state machine
#[derive(Clone, Debug, Default)]
pub struct LineMachine {
    state: LineState,
    hook: HookDebouncer,
    ring: RingGenerator,
    dial: DialDecoder,
    tone: ToneGenerator,
    hangup_ms: u32,
    answered: bool,

    // Commands from the radio machine
    in_service: bool,
    in_call: bool,
    ring_requested: bool,

    // Debounced hook transitions, consumed by the line state evaluation
    hook_edge: Latch<HookState>,

    // Events for the radio machine
    hook_changed: Latch<HookState>,
    digit_dialed: Latch<Digit>,
}

impl LineMachine {
    /// Create a machine resting on-hook, out of service
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: LineState::OnHook,
            hook: HookDebouncer::new(),
            ring: RingGenerator::new(),
            dial: DialDecoder::new(),
            tone: ToneGenerator::new(),
            hangup_ms: 0,
            answered: false,
            in_service: false,
            in_call: false,
            ring_requested: false,
            hook_edge: Latch::new(),
            hook_changed: Latch::new(),
            digit_dialed: Latch::new(),
        }
    }

    /// Put the outputs into their resting state and drop pending events
    pub fn start<S: Slic, A: AudioCapability>(&mut self, slic: &mut S, audio: &mut A) {
        self.ring.stop(slic);
        self.tone.reset(audio);
        self.hook_edge.clear();
        self.hook_changed.clear();
        self.digit_dialed.clear();
    }

    /// Run one 10 ms evaluation pass
    pub fn tick<S: Slic, A: AudioCapability>(&mut self, slic: &mut S, audio: &mut A) {
        if let Some(edge) = self.hook.sample(slic.is_off_hook()) {
            self.hook_edge.post(edge);
        }
        let hook = self.hook.state();

        self.ring.tick(
            self.ring_requested,
            hook,
            self.state == LineState::OnHook,
            slic,
        );

        let detected = detect_dtmf(audio);
        let digit = self.dial.tick(
            hook,
            self.state == LineState::OffHook,
            self.state == LineState::OnHook,
            detected,
        );
        if let Some(digit) = digit {
            info!("Line: digit {}", digit);
            self.digit_dialed.post(digit);
        }

        let inputs = ToneInputs {
            off_hook: matches!(
                self.state,
                LineState::OffHook | LineState::OnHookProvisional
            ),
            in_service: self.in_service,
            in_call: self.in_call,
            digit: digit.is_some(),
            answered: core::mem::take(&mut self.answered),
        };
        self.tone.tick(inputs, audio);

        self.evaluate(hook);
    }

    fn evaluate(&mut self, hook: HookState) {
        let edge = self.hook_edge.take();
        match self.state {
            LineState::OnHook => {
                if edge == Some(HookState::OffHook) {
                    self.transition(LineState::OffHook);
                    self.hook_changed.post(HookState::OffHook);
                } else if self.ring.is_active() {
                    self.transition(LineState::Ringing);
                }
            }
            LineState::OffHook => {
                if edge == Some(HookState::OnHook) {
                    self.hangup_ms = 0;
                    self.transition(LineState::OnHookProvisional);
                }
            }
            LineState::OnHookProvisional => {
                if hook.is_off_hook() {
                    self.transition(LineState::OffHook);
                } else {
                    self.hangup_ms += LINE_TICK_MS;
                    if self.hangup_ms >= HANGUP_CONFIRM_MS {
                        self.transition(LineState::OnHook);
                        self.hook_changed.post(HookState::OnHook);
                    }
                }
            }
            LineState::Ringing => {
                if hook.is_off_hook() {
                    self.answered = true;
                    self.transition(LineState::OffHook);
                    self.hook_changed.post(HookState::OffHook);
                } else if !self.ring.is_active() {
                    self.transition(LineState::OnHook);
                }
            }
        }
    }

    fn transition(&mut self, next: LineState) {
        // Pulse breaks bounce through the provisional state; keep them quiet
        if matches!(next, LineState::OnHookProvisional)
            || matches!(self.state, LineState::OnHookProvisional) && next == LineState::OffHook
        {
            trace!("Line: {} -> {}", self.state.label(), next.label());
        } else {
            info!("Line: {} -> {}", self.state.label(), next.label());
        }
        self.state = next;
    }

    /// Tell the line whether the radio link is up
    pub fn set_in_service(&mut self, in_service: bool) {
        self.in_service = in_service;
    }

    /// Start or stop ringing; takes effect on the next tick
    pub fn set_ring(&mut self, ring: bool) {
        self.ring_requested = ring;
    }

    /// Tell the line whether a call is connected
    pub fn set_in_call(&mut self, in_call: bool) {
        self.in_call = in_call;
    }

    /// Consume the pending hook-changed event
    pub fn take_hook_changed(&mut self) -> Option<HookState> {
        self.hook_changed.take()
    }

    /// Consume the pending digit-dialed event
    pub fn take_digit(&mut self) -> Option<Digit> {
        self.digit_dialed.take()
    }

    /// Line state
    #[must_use]
    pub const fn state(&self) -> LineState {
        self.state
    }

    /// Debounced switch-hook position
    #[must_use]
    pub const fn hook_state(&self) -> HookState {
        self.hook.state()
    }

    /// Ring cadence position
    #[must_use]
    pub const fn ring_state(&self) -> RingState {
        self.ring.state()
    }

    /// Dial decoder position
    #[must_use]
    pub const fn dial_state(&self) -> DialState {
        self.dial.state()
    }

    /// Tone generator state
    #[must_use]
    pub const fn tone_state(&self) -> ToneState {
        self.tone.state()
    }

    /// Digits decoded since the handset was lifted
    #[must_use]
    pub fn dialed(&self) -> &[Digit] {
        self.dial.dialed()
    }

    /// Whether the radio reported the link in service
    #[must_use]
    pub const fn in_service(&self) -> bool {
        self.in_service
    }

    /// Whether a call is connected
    #[must_use]
    pub const fn in_call(&self) -> bool {
        self.in_call
    }

    /// Whether ringing is requested
    #[must_use]
    pub const fn ring_requested(&self) -> bool {
        self.ring_requested
    }
}
