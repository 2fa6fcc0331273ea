//! DSP Tests
//!
//! Software codec: tone synthesis, Goertzel detection and real DTMF audio
//! decoded through the line machine.

mod common;

use std::f32::consts::PI;

use common::{digit, FakeSlic};
use hf_line_bridge::config::{
    AUDIO_SAMPLE_RATE, DETECTOR_BLOCK_SIZE, DTMF_COL_HZ, DTMF_ROW_HZ, TONE_DIAL, TONE_OFF_HOOK,
};
use hf_line_bridge::dsp::goertzel::block_power;
use hf_line_bridge::dsp::{DetectorBank, SoftwareCodec, ToneBank};
use hf_line_bridge::error::Error;
use hf_line_bridge::hal::AudioCapability;
use hf_line_bridge::line::dial::detect_dtmf;
use hf_line_bridge::line::LineMachine;
use hf_line_bridge::types::Digit;

const RATE: f32 = AUDIO_SAMPLE_RATE as f32;

/// Row/column pair for a key
fn dtmf_pair(key: Digit) -> (f32, f32) {
    let (row, col) = match key.value() {
        0 => (3, 1),
        10 => (3, 0),
        11 => (3, 2),
        d => (usize::from((d - 1) / 3), usize::from((d - 1) % 3)),
    };
    (DTMF_ROW_HZ[row], DTMF_COL_HZ[col])
}

/// Samples `start..start + n` of a DTMF key at 0.25 per component
fn dtmf_block(key: Digit, start: usize, n: usize) -> Vec<f32> {
    let (low, high) = dtmf_pair(key);
    (start..start + n)
        .map(|i| {
            let t = i as f32 / RATE;
            0.25 * (2.0 * PI * low * t).sin() + 0.25 * (2.0 * PI * high * t).sin()
        })
        .collect()
}

// ============================================================================
// Tone Bank Tests
// ============================================================================

#[test]
fn test_dial_tone_spectrum() {
    let mut bank = ToneBank::new(RATE);
    for (i, source) in TONE_DIAL.iter().enumerate() {
        bank.set(i, source.frequency, source.amplitude).unwrap();
    }
    let samples: Vec<f32> = (0..400).map(|_| bank.next_sample()).collect();

    let at_350 = block_power(&samples, 350.0, RATE);
    let at_440 = block_power(&samples, 440.0, RATE);
    let at_1000 = block_power(&samples, 1000.0, RATE);
    assert!(at_350 > 0.04, "350 Hz power {at_350}");
    assert!(at_440 > 0.04, "440 Hz power {at_440}");
    assert!(at_1000 < 0.005, "1 kHz power {at_1000}");
}

#[test]
fn test_howler_stays_in_range() {
    let mut bank = ToneBank::new(RATE);
    for (i, source) in TONE_OFF_HOOK.iter().enumerate() {
        bank.set(i, source.frequency, source.amplitude).unwrap();
    }
    assert!((0..8_000).all(|_| bank.next_sample().abs() <= 1.0));
}

// ============================================================================
// Detector Tests
// ============================================================================

#[test]
fn test_every_key_detected() {
    for value in 0..=11 {
        let key = digit(value);
        let mut codec = SoftwareCodec::default();
        for sample in dtmf_block(key, 0, DETECTOR_BLOCK_SIZE) {
            codec.process(sample);
        }
        assert_eq!(detect_dtmf(&mut codec), Some(key), "key {key}");
    }
}

#[test]
fn test_silence_detects_nothing() {
    let mut codec = SoftwareCodec::default();
    for _ in 0..DETECTOR_BLOCK_SIZE {
        codec.process(0.0);
    }
    assert_eq!(detect_dtmf(&mut codec), None);
}

#[test]
fn test_dial_tone_is_not_a_key() {
    let mut codec = SoftwareCodec::default();
    for (i, source) in TONE_DIAL.iter().enumerate() {
        codec.set_tone(i, source.frequency, source.amplitude).unwrap();
    }
    // Loop the codec's own output back into its input
    let mut sample = 0.0;
    for _ in 0..DETECTOR_BLOCK_SIZE * 2 {
        sample = codec.process(sample);
    }
    assert_eq!(detect_dtmf(&mut codec), None);
}

#[test]
fn test_channel_bounds() {
    let bank = DetectorBank::new(RATE, DETECTOR_BLOCK_SIZE);
    assert!(bank.energy(6).is_ok());
    assert_eq!(bank.energy(7), Err(Error::DetectorOutOfRange(7)));

    let mut codec = SoftwareCodec::default();
    assert_eq!(codec.set_tone(4, 440.0, 0.1), Err(Error::OscillatorOutOfRange(4)));
    // The capability swallows the error and reads silence
    assert_eq!(codec.tone_energy(9), 0.0);
}

// ============================================================================
// Line Integration Tests
// ============================================================================

#[test]
fn test_dtmf_audio_through_line_machine() {
    common::init_logging();
    let mut line = LineMachine::new();
    let mut slic = FakeSlic::default();
    let mut codec = SoftwareCodec::default();
    line.start(&mut slic, &mut codec);
    line.set_in_service(true);

    slic.off_hook = true;
    for _ in 0..3 {
        line.tick(&mut slic, &mut codec);
    }

    // 50 ms of key 9, then 50 ms of silence, one block per line tick
    let key = digit(9);
    let mut t = 0;
    let mut got = None;
    for tick in 0..10 {
        let block = if tick < 5 {
            dtmf_block(key, t, DETECTOR_BLOCK_SIZE)
        } else {
            vec![0.0; DETECTOR_BLOCK_SIZE]
        };
        t += DETECTOR_BLOCK_SIZE;
        for sample in block {
            codec.process(sample);
        }
        line.tick(&mut slic, &mut codec);
        got = got.or(line.take_digit());
    }
    assert_eq!(got, Some(key));
}
