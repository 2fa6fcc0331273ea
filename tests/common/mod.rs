//! Host-side stand-ins for the board: UART, SLIC and tone codec

#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;

use hf_line_bridge::config::{ToneSource, ToneTable, NUM_DETECTORS, TONE_SILENT};
use hf_line_bridge::hal::{AudioCapability, Slic};
use hf_line_bridge::protocol::{encode, FrameParser, Packet, ParseOutcome};
use hf_line_bridge::types::Digit;

/// Route crate logs to the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Loopback UART: `rx` is what the module sends, `tx` what the controller wrote
#[derive(Default)]
pub struct FakeUart {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl FakeUart {
    /// Queue a frame from the module
    pub fn inject(&mut self, opcode: u8, payload: &[u8]) {
        let frame = encode(opcode, payload).unwrap();
        self.rx.extend(frame.iter().copied());
    }

    /// Decode and clear everything the controller sent
    pub fn take_sent(&mut self) -> Vec<Packet> {
        let mut parser = FrameParser::new();
        let sent = self
            .tx
            .iter()
            .filter_map(|&b| match parser.feed(b) {
                ParseOutcome::Packet(p) => Some(p),
                _ => None,
            })
            .collect();
        self.tx.clear();
        sent
    }
}

impl embedded_io::ErrorType for FakeUart {
    type Error = Infallible;
}

impl embedded_io::Read for FakeUart {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for FakeUart {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }
}

impl embedded_io::Write for FakeUart {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// SLIC with a settable hook switch
#[derive(Default)]
pub struct FakeSlic {
    pub off_hook: bool,
    pub reversed: bool,
    pub ring_mode: bool,
    pub polarity_flips: u32,
}

impl Slic for FakeSlic {
    fn is_off_hook(&mut self) -> bool {
        self.off_hook
    }

    fn set_polarity_reversed(&mut self, reversed: bool) {
        if reversed != self.reversed {
            self.polarity_flips += 1;
        }
        self.reversed = reversed;
    }

    fn set_ring_mode(&mut self, ringing: bool) {
        self.ring_mode = ringing;
    }
}

/// Codec whose detector energies are set by the test
pub struct FakeAudio {
    pub energies: [f32; NUM_DETECTORS],
    pub oscillators: ToneTable,
}

impl Default for FakeAudio {
    fn default() -> Self {
        Self {
            energies: [0.0; NUM_DETECTORS],
            oscillators: TONE_SILENT,
        }
    }
}

impl FakeAudio {
    /// Hold a DTMF key down
    pub fn press(&mut self, digit: Digit) {
        let (row, col) = match digit.value() {
            0 => (3, 1),
            10 => (3, 0),
            11 => (3, 2),
            d => ((d - 1) / 3, (d - 1) % 3),
        };
        self.energies = [0.0; NUM_DETECTORS];
        self.energies[usize::from(row)] = 0.25;
        self.energies[4 + usize::from(col)] = 0.25;
    }

    /// Let go of the key
    pub fn release(&mut self) {
        self.energies = [0.0; NUM_DETECTORS];
    }
}

impl AudioCapability for FakeAudio {
    fn tone_energy(&mut self, channel: usize) -> f32 {
        self.energies[channel]
    }

    fn set_oscillator(&mut self, index: usize, frequency: f32, amplitude: f32) {
        self.oscillators[index] = ToneSource::new(frequency, amplitude);
    }
}

/// Digit from a test literal
pub fn digit(value: u8) -> Digit {
    Digit::new(value).unwrap()
}
