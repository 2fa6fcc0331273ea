//! Controller
//!
//! Owns the link engine, both state machines and the hardware handles, and
//! runs one cooperative scheduler pass per [`Controller::poll`]: drain the
//! UART, then evaluate whichever of the 10 ms line tick and 20 ms radio tick
//! is due. Also carries the console/diagnostics entry points.

use embedded_io::{Error as _, Read, ReadReady, Write};

use crate::clock::{Millis, Periodic};
use crate::config::{LINE_TICK_MS, RADIO_TICK_MS};
use crate::error::{Error, Result};
use crate::hal::{AudioCapability, ConfigStore, Slic};
use crate::line::{DialState, LineMachine, LineState, RingState, ToneState};
use crate::protocol::{LinkEngine, Packet};
use crate::radio::{CallState, RadioConnectionState, RadioMachine};
use crate::types::PairingIndex;

/// Bytes pulled from the UART per read call
const READ_CHUNK: usize = 32;

/// Point-in-time view of every state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    /// Radio connection/call state
    pub radio: RadioConnectionState,
    /// Call status last reported by the module
    pub call: CallState,
    /// Line state
    pub line: LineState,
    /// Ring cadence position
    pub ring: RingState,
    /// Dial decoder position
    pub dial: DialState,
    /// Tone generator state
    pub tone: ToneState,
    /// Radio link in service
    pub in_service: bool,
    /// Pairing index used for reconnects
    pub pairing_index: PairingIndex,
}

/// Line bridge controller
pub struct Controller<U, S, A, C> {
    serial: U,
    slic: S,
    audio: A,
    store: C,
    link: LinkEngine,
    radio: RadioMachine,
    line: LineMachine,
    line_tick: Periodic,
    radio_tick: Periodic,
    reset_requested: bool,
}

impl<U, S, A, C> Controller<U, S, A, C>
where
    U: Read + ReadReady + Write,
    S: Slic,
    A: AudioCapability,
    C: ConfigStore,
{
    /// Build the controller and put the line outputs at rest
    ///
    /// An out-of-range stored pairing index falls back to 0.
    pub fn new(serial: U, mut slic: S, mut audio: A, mut store: C, now: Millis) -> Self {
        let pairing = PairingIndex::new(store.read_pairing_index()).unwrap_or_else(|e| {
            warn!("Controller: {}, using device 0", e);
            PairingIndex::default()
        });

        let mut line = LineMachine::new();
        line.start(&mut slic, &mut audio);
        info!("Controller: started, pairing index {}", pairing.get());

        Self {
            serial,
            slic,
            audio,
            store,
            link: LinkEngine::new(),
            radio: RadioMachine::new(pairing),
            line,
            line_tick: Periodic::new(LINE_TICK_MS, now),
            radio_tick: Periodic::new(RADIO_TICK_MS, now),
            reset_requested: false,
        }
    }

    /// One scheduler pass
    pub fn poll(&mut self, now: Millis) {
        self.drain_serial();

        if self.line_tick.poll(now) {
            self.line.tick(&mut self.slic, &mut self.audio);
        }

        if self.radio_tick.poll(now) {
            if core::mem::take(&mut self.reset_requested) {
                self.link.reset();
                let mut tx = self.link.tx(&mut self.serial);
                self.radio.reset(&mut self.line, &mut tx);
            }
            let mut tx = self.link.tx(&mut self.serial);
            self.radio.tick(&mut self.line, &mut tx);
        }
    }

    fn drain_serial(&mut self) {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match self.serial.read_ready() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!("Controller: {}", Error::Serial(e.kind()));
                    break;
                }
            }

            let n = match self.serial.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    warn!("Controller: {}", Error::Serial(e.kind()));
                    break;
                }
            };

            for &byte in &buf[..n] {
                let Some(packet) = self.link.receive(byte) else {
                    continue;
                };
                if let Err(e) = self.link.acknowledge(&mut self.serial, &packet) {
                    warn!("Controller: ack failed: {}", e);
                }
                self.radio.handle_packet(&packet);
            }
        }
    }

    /// Store a new pairing index and use it for future reconnects
    ///
    /// # Errors
    ///
    /// Returns [`Error::PairingIndexOutOfRange`] for values above 7; the
    /// previous index is kept.
    pub fn set_pairing_index(&mut self, index: u8) -> Result<()> {
        let index = PairingIndex::new(index)?;
        self.store.write_pairing_index(index);
        self.radio.set_pairing_index(index);
        info!("Controller: pairing index {}", index.get());
        Ok(())
    }

    /// Put the radio module into pairing mode on the next radio tick
    pub fn request_pairing_enable(&mut self) {
        self.radio.request_pairing_enable();
    }

    /// Frame and send `[opcode, payload...]` as-is
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or oversized packet, or if the UART
    /// write fails.
    pub fn send_raw_packet(&mut self, bytes: &[u8]) -> Result<()> {
        let packet = Packet::from_raw(bytes)?;
        self.link.send(&mut self.serial, &packet)
    }

    /// Log every frame received, dropped and sent
    pub fn set_verbose_logging(&mut self, verbose: bool) {
        self.link.set_verbose(verbose);
    }

    /// Re-initialize the radio machine and link parser on the next radio tick
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Snapshot of every state machine
    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            radio: self.radio.state(),
            call: self.radio.call_state(),
            line: self.line.state(),
            ring: self.line.ring_state(),
            dial: self.line.dial_state(),
            tone: self.line.tone_state(),
            in_service: self.line.in_service(),
            pairing_index: self.radio.pairing_index(),
        }
    }

    /// Radio machine
    #[must_use]
    pub const fn radio(&self) -> &RadioMachine {
        &self.radio
    }

    /// Line machine
    #[must_use]
    pub const fn line(&self) -> &LineMachine {
        &self.line
    }

    /// Link engine
    #[must_use]
    pub const fn link(&self) -> &LinkEngine {
        &self.link
    }

    /// UART handle
    pub fn serial_mut(&mut self) -> &mut U {
        &mut self.serial
    }

    /// Line interface handle
    pub fn slic_mut(&mut self) -> &mut S {
        &mut self.slic
    }

    /// Audio capability handle
    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Configuration store
    #[must_use]
    pub const fn store(&self) -> &C {
        &self.store
    }
}
