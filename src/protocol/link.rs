//! Link protocol engine
//!
//! Wraps the frame parser with the dispatch rules (non-zero opcode, valid
//! checksum), diagnostics counters and the outbound framing path. Sends are
//! fire-and-forget: response handling belongs to the radio state machine.

use embedded_io::{Error as _, Write};

use super::frame::Packet;
use super::message::Command;
use super::parser::{FrameParser, ParseOutcome};
use crate::error::{Error, Result};

/// Anything that can carry a packet to the radio module
pub trait PacketSink {
    /// Frame and send one packet
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    fn send(&mut self, packet: &Packet) -> Result<()>;
}

/// Link diagnostics counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Packets dispatched to the radio state machine
    pub dispatched: u32,
    /// Frames dropped for a checksum mismatch
    pub checksum_errors: u32,
    /// Frames dropped for a bad length field
    pub malformed: u32,
    /// Frames written to the module
    pub sent: u32,
}

/// Inbound/outbound link protocol engine
#[derive(Clone, Debug, Default)]
pub struct LinkEngine {
    parser: FrameParser,
    verbose: bool,
    stats: LinkStats,
}

impl LinkEngine {
    /// Create an idle engine
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parser: FrameParser::new(),
            verbose: false,
            stats: LinkStats {
                dispatched: 0,
                checksum_errors: 0,
                malformed: 0,
                sent: 0,
            },
        }
    }

    /// Enable or disable per-frame logging
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if per-frame logging is on
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Diagnostics counters
    #[must_use]
    pub const fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Feed one received byte; returns a packet ready for dispatch
    pub fn receive(&mut self, byte: u8) -> Option<Packet> {
        match self.parser.feed(byte) {
            ParseOutcome::Pending | ParseOutcome::NullOpcode => None,
            ParseOutcome::Packet(packet) => {
                self.stats.dispatched = self.stats.dispatched.wrapping_add(1);
                if self.verbose {
                    debug!("link rx op={} len={}", packet.opcode(), packet.payload().len());
                }
                Some(packet)
            }
            ParseOutcome::ChecksumMismatch {
                opcode,
                expected,
                received,
            } => {
                self.stats.checksum_errors = self.stats.checksum_errors.wrapping_add(1);
                if self.verbose {
                    warn!(
                        "link rx checksum mismatch op={} expected={} received={}",
                        opcode,
                        expected,
                        received
                    );
                }
                None
            }
            ParseOutcome::Malformed(length) => {
                self.stats.malformed = self.stats.malformed.wrapping_add(1);
                if self.verbose {
                    warn!("link rx bad length {}", length);
                }
                None
            }
        }
    }

    /// Frame and write one packet
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serial`] if the writer fails.
    pub fn send<W: Write>(&mut self, writer: &mut W, packet: &Packet) -> Result<()> {
        let frame = packet.encode();
        writer
            .write_all(&frame)
            .map_err(|e| Error::Serial(e.kind()))?;
        self.stats.sent = self.stats.sent.wrapping_add(1);
        if self.verbose {
            debug!("link tx op={} len={}", packet.opcode(), packet.payload().len());
        }
        Ok(())
    }

    /// Send the automatic acknowledgement for a dispatched packet
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serial`] if the writer fails.
    pub fn acknowledge<W: Write>(&mut self, writer: &mut W, packet: &Packet) -> Result<()> {
        self.send(writer, &Command::Acknowledge(packet.opcode()).to_packet())
    }

    /// Drop any partial inbound frame
    pub fn reset(&mut self) {
        self.parser.reset();
    }

    /// Borrow the engine together with a writer as a [`PacketSink`]
    pub fn tx<'a, W: Write>(&'a mut self, writer: &'a mut W) -> LinkTx<'a, W> {
        LinkTx {
            engine: self,
            writer,
        }
    }
}

/// A link engine bound to its UART writer
pub struct LinkTx<'a, W: Write> {
    engine: &'a mut LinkEngine,
    writer: &'a mut W,
}

impl<W: Write> PacketSink for LinkTx<'_, W> {
    fn send(&mut self, packet: &Packet) -> Result<()> {
        self.engine.send(&mut *self.writer, packet)
    }
}
