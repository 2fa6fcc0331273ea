//! System configuration and timing constants
//!
//! Every cadence, debounce window and timeout the state machines use is
//! centralized here, together with the tone tables and the hardware pin map.
//! Durations are in milliseconds unless the name says otherwise.

/// Line state machine evaluation period
pub const LINE_TICK_MS: u32 = 10;

/// Radio state machine evaluation period
pub const RADIO_TICK_MS: u32 = 20;

/// Time without link before the radio retries the stored pairing
pub const RECONNECT_WINDOW_MS: u32 = 60_000;

/// Reconnect window expressed in radio ticks
pub const RECONNECT_TICKS: u32 = RECONNECT_WINDOW_MS / RADIO_TICK_MS;

/// Continuous on-hook time that confirms a hang-up
pub const HANGUP_CONFIRM_MS: u32 = 500;

/// Ring burst duration
pub const RING_ON_MS: u32 = 1_000;

/// Silence between ring bursts
pub const RING_OFF_MS: u32 = 3_000;

/// Ring current frequency (polarity reversals during a burst)
pub const RING_FREQUENCY_HZ: u32 = 25;

/// Half period of the ring current
pub const RING_HALF_PERIOD_MS: u32 = 1_000 / RING_FREQUENCY_HZ / 2;

/// Longest break that still counts as a rotary pulse
pub const PULSE_BREAK_MAX_MS: u32 = 100;

/// Make interval that ends a rotary digit
pub const INTER_DIGIT_MAKE_MS: u32 = 100;

/// Continuous detection needed before a DTMF tone is accepted
pub const DTMF_DRIVEN_MS: u32 = 30;

/// Silence needed after a DTMF tone before the digit is finalized
pub const DTMF_SILENT_MS: u32 = 30;

/// Maximum digits in one dial attempt
pub const MAX_DIAL_DIGITS: usize = 10;

/// Dial tone duration before the off-hook warning starts
pub const DIAL_TONE_TIMEOUT_MS: u32 = 60_000;

/// Silent off-hook time (no call) before the off-hook warning starts
pub const OFF_HOOK_WARNING_DELAY_MS: u32 = 60_000;

/// No-service tone on time
pub const NO_SERVICE_ON_MS: u32 = 300;

/// No-service tone off time
pub const NO_SERVICE_OFF_MS: u32 = 200;

/// Off-hook warning on time
pub const OFF_HOOK_ON_MS: u32 = 100;

/// Off-hook warning off time
pub const OFF_HOOK_OFF_MS: u32 = 100;

/// Number of simultaneous oscillators in the tone generator
pub const NUM_OSCILLATORS: usize = 4;

/// Number of DTMF detector channels (4 rows + 3 columns)
pub const NUM_DETECTORS: usize = 7;

/// DTMF row frequencies (detector channels 0-3)
pub const DTMF_ROW_HZ: [f32; 4] = [697.0, 770.0, 852.0, 941.0];

/// DTMF column frequencies (detector channels 4-6)
pub const DTMF_COL_HZ: [f32; 3] = [1209.0, 1336.0, 1477.0];

/// Minimum normalized energy for a DTMF frequency to count as present
pub const DTMF_ENERGY_THRESHOLD: f32 = 0.01;

/// The winning row/column must beat every other one in its group by this ratio
pub const DTMF_DOMINANCE_RATIO: f32 = 4.0;

/// A tone table entry: one oscillator frequency and amplitude
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ToneSource {
    /// Frequency in Hz
    pub frequency: f32,
    /// Linear amplitude (0.0 disables the oscillator)
    pub amplitude: f32,
}

impl ToneSource {
    /// A silent oscillator
    pub const SILENT: Self = Self::new(0.0, 0.0);

    /// Create a tone source
    #[must_use]
    pub const fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            amplitude,
        }
    }
}

/// Oscillator configuration for one tone
pub type ToneTable = [ToneSource; NUM_OSCILLATORS];

/// All oscillators off
pub const TONE_SILENT: ToneTable = [ToneSource::SILENT; NUM_OSCILLATORS];

/// North American dial tone (350 + 440 Hz)
pub const TONE_DIAL: ToneTable = [
    ToneSource::new(350.0, 0.25),
    ToneSource::new(440.0, 0.25),
    ToneSource::SILENT,
    ToneSource::SILENT,
];

/// Reorder tone used for "no service" (480 + 620 Hz)
pub const TONE_NO_SERVICE: ToneTable = [
    ToneSource::new(480.0, 0.25),
    ToneSource::new(620.0, 0.25),
    ToneSource::SILENT,
    ToneSource::SILENT,
];

/// Receiver off-hook howler (1400 + 2060 + 2450 + 2600 Hz)
pub const TONE_OFF_HOOK: ToneTable = [
    ToneSource::new(1400.0, 0.2),
    ToneSource::new(2060.0, 0.2),
    ToneSource::new(2450.0, 0.2),
    ToneSource::new(2600.0, 0.2),
];

/// Speaker gain sent to the radio module when a call becomes active
pub const CALL_SPEAKER_GAIN: u8 = 0x0F;

/// Highest valid pairing index
pub const PAIRING_INDEX_MAX: u8 = 7;

/// Radio module UART baud rate
pub const RADIO_UART_BAUD: u32 = 115_200;

/// Bytes buffered between the UART and the link parser
pub const RADIO_RX_BUFFER_SIZE: usize = 256;

/// Bytes buffered for outbound frames
pub const RADIO_TX_BUFFER_SIZE: usize = 256;

/// Audio sample rate for tone synthesis and detection
pub const AUDIO_SAMPLE_RATE: u32 = 8_000;

/// Samples per Goertzel detection block (10 ms at 8 kHz, one line tick)
pub const DETECTOR_BLOCK_SIZE: usize = 80;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED
    pub const LED_STATUS: &str = "PA5";

    /// SLIC switch-hook detect (active high = off-hook)
    pub const SLIC_SHK: &str = "PB0";

    /// SLIC forward/reverse polarity control
    pub const SLIC_FR: &str = "PB1";

    /// SLIC ring mode control
    pub const SLIC_RM: &str = "PB2";

    /// Radio module UART TX
    pub const RADIO_TX: &str = "PA9";

    /// Radio module UART RX
    pub const RADIO_RX: &str = "PA10";

    /// Line audio ADC input (from the SLIC receive path)
    pub const LINE_AUDIO_IN: &str = "PA0";

    /// Line audio DAC output (to the SLIC transmit path)
    pub const LINE_AUDIO_OUT: &str = "PA4";
}
