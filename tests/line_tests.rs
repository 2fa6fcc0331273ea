//! Line State Machine Tests
//!
//! Drives the line machine tick by tick against a fake SLIC and codec:
//! hook debounce, hang-up confirmation, rotary and DTMF decoding, ring
//! cadence and call-progress tones.

mod common;

use common::{digit, FakeAudio, FakeSlic};
use hf_line_bridge::config::*;
use hf_line_bridge::line::{DialState, LineMachine, LineState, RingState, ToneState};
use hf_line_bridge::types::HookState;

struct Bench {
    line: LineMachine,
    slic: FakeSlic,
    audio: FakeAudio,
}

impl Bench {
    fn new(in_service: bool) -> Self {
        common::init_logging();
        let mut bench = Self {
            line: LineMachine::new(),
            slic: FakeSlic::default(),
            audio: FakeAudio::default(),
        };
        bench.line.start(&mut bench.slic, &mut bench.audio);
        bench.line.set_in_service(in_service);
        bench
    }

    fn run_ms(&mut self, ms: u32) {
        for _ in 0..ms / LINE_TICK_MS {
            self.line.tick(&mut self.slic, &mut self.audio);
        }
    }

    fn lift(&mut self) {
        self.slic.off_hook = true;
        self.run_ms(2 * LINE_TICK_MS);
        assert_eq!(self.line.take_hook_changed(), Some(HookState::OffHook));
    }

    fn pulse_dial(&mut self, pulses: u8) {
        for _ in 0..pulses {
            self.slic.off_hook = false;
            self.run_ms(60);
            self.slic.off_hook = true;
            self.run_ms(40);
        }
        self.run_ms(150);
    }

    fn key(&mut self, value: u8) {
        self.audio.press(digit(value));
        self.run_ms(50);
        self.audio.release();
        self.run_ms(50);
    }
}

// ============================================================================
// Hook Tests
// ============================================================================

#[test]
fn test_glitch_never_registers() {
    let mut bench = Bench::new(true);
    bench.slic.off_hook = true;
    bench.run_ms(LINE_TICK_MS);
    bench.slic.off_hook = false;
    bench.run_ms(100);
    assert_eq!(bench.line.state(), LineState::OnHook);
    assert_eq!(bench.line.take_hook_changed(), None);
}

#[test]
fn test_hang_up_confirmed_after_500ms() {
    let mut bench = Bench::new(true);
    bench.lift();

    bench.slic.off_hook = false;
    bench.run_ms(2 * LINE_TICK_MS);
    assert_eq!(bench.line.state(), LineState::OnHookProvisional);
    bench.run_ms(HANGUP_CONFIRM_MS - LINE_TICK_MS);
    assert_eq!(bench.line.take_hook_changed(), None);
    bench.run_ms(LINE_TICK_MS);
    assert_eq!(bench.line.state(), LineState::OnHook);
    assert_eq!(bench.line.take_hook_changed(), Some(HookState::OnHook));
    bench.run_ms(LINE_TICK_MS);
    assert_eq!(bench.line.tone_state(), ToneState::Idle);
}

#[test]
fn test_flash_shorter_than_confirm_is_not_hang_up() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.slic.off_hook = false;
    bench.run_ms(300);
    bench.slic.off_hook = true;
    bench.run_ms(50);
    assert_eq!(bench.line.state(), LineState::OffHook);
    assert_eq!(bench.line.take_hook_changed(), None);
    assert_eq!(bench.line.take_digit(), None);
}

// ============================================================================
// Dial Tests
// ============================================================================

#[test]
fn test_rotary_single_pulse_is_one() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.pulse_dial(1);
    assert_eq!(bench.line.take_digit(), Some(digit(1)));
    assert_eq!(bench.line.take_hook_changed(), None);
    assert_eq!(bench.line.state(), LineState::OffHook);
}

#[test]
fn test_rotary_ten_pulses_is_zero() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.pulse_dial(10);
    assert_eq!(bench.line.take_digit(), Some(digit(0)));
}

#[test]
fn test_rotary_sequence() {
    let mut bench = Bench::new(true);
    bench.lift();
    let mut got = Vec::new();
    for n in [5, 5, 1] {
        bench.pulse_dial(n);
        got.extend(bench.line.take_digit());
    }
    assert_eq!(got, vec![digit(5), digit(5), digit(1)]);
    assert_eq!(bench.line.dialed(), &[digit(5), digit(5), digit(1)]);
}

#[test]
fn test_dtmf_row0_col1_is_two() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.audio.press(digit(2));
    bench.run_ms(DTMF_DRIVEN_MS + LINE_TICK_MS);
    assert_eq!(bench.line.dial_state(), DialState::DtmfOn);
    bench.audio.release();
    bench.run_ms(DTMF_SILENT_MS);
    assert_eq!(bench.line.take_digit(), Some(digit(2)));
    assert_eq!(bench.line.dial_state(), DialState::Idle);
}

#[test]
fn test_dtmf_star_and_hash() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.key(10);
    assert_eq!(bench.line.take_digit(), Some(digit(10)));
    bench.key(11);
    assert_eq!(bench.line.take_digit(), Some(digit(11)));
}

#[test]
fn test_dtmf_too_short_discarded() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.audio.press(digit(8));
    bench.run_ms(20);
    bench.audio.release();
    bench.run_ms(100);
    assert_eq!(bench.line.take_digit(), None);
}

#[test]
fn test_dtmf_ignored_on_hook() {
    let mut bench = Bench::new(true);
    bench.key(4);
    assert_eq!(bench.line.take_digit(), None);
}

#[test]
fn test_sequence_cleared_after_ten_digits() {
    let mut bench = Bench::new(true);
    bench.lift();
    for value in [5, 5, 5, 1, 2, 3, 4, 5, 6] {
        bench.key(value);
    }
    assert_eq!(bench.line.dialed().len(), 9);
    bench.key(7);
    assert!(bench.line.dialed().is_empty());
}

#[test]
fn test_sequence_truncated_on_hang_up() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.key(9);
    assert_eq!(bench.line.dialed().len(), 1);
    bench.slic.off_hook = false;
    bench.run_ms(HANGUP_CONFIRM_MS + 50);
    assert!(bench.line.dialed().is_empty());
}

// ============================================================================
// Ring Tests
// ============================================================================

#[test]
fn test_ring_cadence() {
    let mut bench = Bench::new(true);
    bench.line.set_ring(true);
    bench.run_ms(LINE_TICK_MS);
    assert_eq!(bench.line.state(), LineState::Ringing);
    assert!(bench.slic.ring_mode);

    bench.run_ms(RING_ON_MS);
    assert_eq!(bench.line.ring_state(), RingState::Between);
    // 25 Hz for one second: 50 half cycles
    assert_eq!(bench.slic.polarity_flips, 50);

    bench.run_ms(RING_OFF_MS);
    assert_eq!(bench.line.ring_state(), RingState::PulseOn);
}

#[test]
fn test_ring_stop_returns_on_hook() {
    let mut bench = Bench::new(true);
    bench.line.set_ring(true);
    bench.run_ms(200);
    bench.line.set_ring(false);
    bench.run_ms(LINE_TICK_MS);
    assert_eq!(bench.line.ring_state(), RingState::Idle);
    assert_eq!(bench.line.state(), LineState::OnHook);
    assert!(!bench.slic.ring_mode);
    assert!(!bench.slic.reversed);
}

#[test]
fn test_answer_cancels_ring_within_one_tick() {
    let mut bench = Bench::new(true);
    bench.line.set_ring(true);
    bench.run_ms(50);
    assert!(bench.slic.reversed);

    bench.slic.off_hook = true;
    bench.run_ms(2 * LINE_TICK_MS);
    assert_eq!(bench.line.ring_state(), RingState::Idle);
    assert!(!bench.slic.reversed);
    assert!(!bench.slic.ring_mode);
    assert_eq!(bench.line.state(), LineState::OffHook);
    assert_eq!(bench.line.take_hook_changed(), Some(HookState::OffHook));

    bench.run_ms(LINE_TICK_MS);
    assert_eq!(bench.line.tone_state(), ToneState::Off);
    assert_eq!(bench.audio.oscillators, TONE_SILENT);
}

#[test]
fn test_ring_never_starts_off_hook() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.line.set_ring(true);
    bench.run_ms(200);
    assert_eq!(bench.line.ring_state(), RingState::Idle);
    assert!(!bench.slic.ring_mode);
}

// ============================================================================
// Tone Tests
// ============================================================================

#[test]
fn test_dial_tone_in_service() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.run_ms(LINE_TICK_MS);
    assert_eq!(bench.line.tone_state(), ToneState::Dial);
    assert_eq!(bench.audio.oscillators, TONE_DIAL);
}

#[test]
fn test_no_service_tone() {
    let mut bench = Bench::new(false);
    bench.lift();
    bench.run_ms(LINE_TICK_MS);
    assert_eq!(bench.line.tone_state(), ToneState::NoServiceOn);
    assert_eq!(bench.audio.oscillators, TONE_NO_SERVICE);
    bench.run_ms(NO_SERVICE_ON_MS);
    assert_eq!(bench.line.tone_state(), ToneState::NoServiceOff);
    assert_eq!(bench.audio.oscillators, TONE_SILENT);
}

#[test]
fn test_digit_silences_dial_tone() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.key(3);
    assert_eq!(bench.line.tone_state(), ToneState::Off);
    assert_eq!(bench.audio.oscillators, TONE_SILENT);
}

#[test]
fn test_off_hook_warning_after_a_minute() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.run_ms(DIAL_TONE_TIMEOUT_MS);
    assert_eq!(bench.line.tone_state(), ToneState::Dial);
    bench.run_ms(2 * LINE_TICK_MS);
    assert_eq!(bench.line.tone_state(), ToneState::OffHookOn);
    assert_eq!(bench.audio.oscillators, TONE_OFF_HOOK);
    bench.run_ms(OFF_HOOK_ON_MS);
    assert_eq!(bench.line.tone_state(), ToneState::OffHookOff);

    bench.key(1);
    assert_eq!(bench.line.tone_state(), ToneState::Off);
}

#[test]
fn test_in_call_keeps_tone_off() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.line.set_in_call(true);
    bench.run_ms(OFF_HOOK_WARNING_DELAY_MS + 1_000);
    assert_eq!(bench.line.tone_state(), ToneState::Off);
}

#[test]
fn test_warning_after_call_ends_off_hook() {
    let mut bench = Bench::new(true);
    bench.lift();
    bench.line.set_in_call(true);
    bench.run_ms(100);
    assert_eq!(bench.line.tone_state(), ToneState::Off);

    // Far end hung up, handset left off-hook
    bench.line.set_in_call(false);
    bench.run_ms(OFF_HOOK_WARNING_DELAY_MS - LINE_TICK_MS);
    assert_eq!(bench.line.tone_state(), ToneState::Off);
    bench.run_ms(2 * LINE_TICK_MS);
    assert_eq!(bench.line.tone_state(), ToneState::OffHookOn);
    assert_eq!(bench.audio.oscillators, TONE_OFF_HOOK);
    bench.run_ms(OFF_HOOK_ON_MS);
    assert_eq!(bench.line.tone_state(), ToneState::OffHookOff);

    bench.key(4);
    assert_eq!(bench.line.tone_state(), ToneState::Off);
    assert_eq!(bench.audio.oscillators, TONE_SILENT);
}
