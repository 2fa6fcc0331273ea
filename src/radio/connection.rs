//! Radio connection/call state machine

use heapless::Vec;

use crate::config::{CALL_SPEAKER_GAIN, MAX_DIAL_DIGITS, RECONNECT_TICKS};
use crate::line::LineMachine;
use crate::protocol::{CallAction, Command, Inbound, LinkStatus, Packet, PacketSink};
use crate::protocol::message::{CallerId, DialString};
use crate::types::{Digit, HookState, PairingIndex};

use super::state::{CallState, RadioConnectionState};

/// Connection and call state machine
#[derive(Clone, Debug)]
pub struct RadioMachine {
    state: RadioConnectionState,
    call_state: CallState,
    link: LinkStatus,
    reconnect_ticks: u32,
    pairing: PairingIndex,
    digits: Vec<Digit, MAX_DIAL_DIGITS>,
    caller_id: CallerId,
    pairing_requested: bool,
}

impl Default for RadioMachine {
    fn default() -> Self {
        Self::new(PairingIndex::default())
    }
}

impl RadioMachine {
    /// Create a disconnected machine that reconnects to `pairing`
    #[must_use]
    pub const fn new(pairing: PairingIndex) -> Self {
        Self {
            state: RadioConnectionState::Disconnected,
            call_state: CallState::Idle,
            link: LinkStatus {
                connected: false,
                audio: false,
            },
            reconnect_ticks: RECONNECT_TICKS,
            pairing,
            digits: Vec::new(),
            caller_id: CallerId::new(),
            pairing_requested: false,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> RadioConnectionState {
        self.state
    }

    /// Last call status reported by the module
    #[must_use]
    pub const fn call_state(&self) -> CallState {
        self.call_state
    }

    /// Last link status reported by the module
    #[must_use]
    pub const fn link_status(&self) -> LinkStatus {
        self.link
    }

    /// Caller ID of the current incoming call, empty if none
    #[must_use]
    pub fn caller_id(&self) -> &str {
        self.caller_id.as_str()
    }

    /// Digits collected in the current dial attempt
    #[must_use]
    pub fn digits(&self) -> &[Digit] {
        &self.digits
    }

    /// Radio ticks left before the next reconnect attempt
    #[must_use]
    pub const fn reconnect_ticks(&self) -> u32 {
        self.reconnect_ticks
    }

    /// Pairing index used for reconnect attempts
    #[must_use]
    pub const fn pairing_index(&self) -> PairingIndex {
        self.pairing
    }

    /// Change the pairing index used for reconnect attempts
    pub fn set_pairing_index(&mut self, index: PairingIndex) {
        self.pairing = index;
    }

    /// Ask the module to enter pairing mode on the next tick
    pub fn request_pairing_enable(&mut self) {
        self.pairing_requested = true;
    }

    /// Apply a dispatched packet to the link/call status
    pub fn handle_packet(&mut self, packet: &Packet) {
        match Inbound::parse(packet) {
            Some(Inbound::LinkStatus(status)) => {
                if status != self.link {
                    info!(
                        "Radio: link connected={} audio={}",
                        status.connected,
                        status.audio
                    );
                }
                self.link = status;
            }
            Some(Inbound::CallStatus(call)) => {
                if call != self.call_state {
                    debug!("Radio: call {} -> {}", self.call_state.label(), call.label());
                }
                self.call_state = call;
            }
            Some(Inbound::CallerId(text)) => {
                info!("Radio: caller ID {}", text.as_str());
                self.caller_id = text;
            }
            Some(Inbound::Other(opcode)) => {
                trace!("Radio: ignoring opcode {}", opcode);
            }
            None => {
                warn!("Radio: malformed payload for opcode {}", packet.opcode());
            }
        }
    }

    /// Run one 20 ms evaluation pass
    pub fn tick<P: PacketSink>(&mut self, line: &mut LineMachine, link: &mut P) {
        let hook = line.take_hook_changed();
        let digit = line.take_digit();

        if core::mem::take(&mut self.pairing_requested) {
            info!("Radio: pairing enable");
            send(link, &Command::PairingEnable);
        }

        let connected = self.link.connected;
        let call = self.call_state;
        let hung_up = hook == Some(HookState::OnHook);
        let lifted = hook == Some(HookState::OffHook);

        match self.state {
            RadioConnectionState::Disconnected => {
                if connected {
                    self.transition(RadioConnectionState::ConnectedIdle, line, link);
                } else {
                    self.reconnect_ticks = self.reconnect_ticks.saturating_sub(1);
                    if self.reconnect_ticks == 0 {
                        info!("Radio: reconnecting to device {}", self.pairing.get());
                        send(link, &Command::Connect(self.pairing));
                        self.reconnect_ticks = RECONNECT_TICKS;
                    }
                }
            }
            RadioConnectionState::ConnectedIdle => {
                if !connected {
                    self.transition(RadioConnectionState::Disconnected, line, link);
                } else if lifted {
                    self.transition(RadioConnectionState::Dialing, line, link);
                } else if call == CallState::Incoming {
                    self.transition(RadioConnectionState::CallReceived, line, link);
                }
            }
            RadioConnectionState::Dialing => {
                if !connected {
                    self.transition(RadioConnectionState::Disconnected, line, link);
                } else if hung_up {
                    self.transition(RadioConnectionState::ConnectedIdle, line, link);
                } else if let Some(digit) = digit {
                    self.collect(digit, line, link);
                }
            }
            RadioConnectionState::CallInitiated => {
                if hung_up {
                    send(link, &Command::CallControl(CallAction::Drop));
                    self.transition(RadioConnectionState::ConnectedIdle, line, link);
                } else if !connected {
                    self.transition(RadioConnectionState::Disconnected, line, link);
                } else if call == CallState::Active {
                    self.transition(RadioConnectionState::CallActive, line, link);
                } else if call == CallState::Outgoing {
                    self.transition(RadioConnectionState::CallOutgoing, line, link);
                }
            }
            RadioConnectionState::CallOutgoing => {
                if hung_up {
                    send(link, &Command::CallControl(CallAction::Drop));
                    self.transition(RadioConnectionState::ConnectedIdle, line, link);
                } else if !connected {
                    self.transition(RadioConnectionState::Disconnected, line, link);
                } else if call == CallState::Active {
                    self.transition(RadioConnectionState::CallActive, line, link);
                } else if call == CallState::Idle {
                    self.transition(RadioConnectionState::ConnectedIdle, line, link);
                }
            }
            RadioConnectionState::CallActive => {
                if hung_up {
                    send(link, &Command::CallControl(CallAction::Drop));
                    self.transition(RadioConnectionState::ConnectedIdle, line, link);
                } else if !connected || call == CallState::Idle {
                    self.transition(RadioConnectionState::ConnectedIdle, line, link);
                }
            }
            RadioConnectionState::CallReceived => {
                if !connected {
                    self.transition(RadioConnectionState::Disconnected, line, link);
                } else if lifted {
                    send(link, &Command::CallControl(CallAction::Accept));
                    self.transition(RadioConnectionState::CallActive, line, link);
                } else if call != CallState::Incoming {
                    self.transition(RadioConnectionState::ConnectedIdle, line, link);
                }
            }
        }
    }

    /// Drop all link/call knowledge and fall back to `Disconnected`
    pub fn reset<P: PacketSink>(&mut self, line: &mut LineMachine, link: &mut P) {
        warn!("Radio: reset");
        self.link = LinkStatus::default();
        self.call_state = CallState::Idle;
        self.pairing_requested = false;
        self.digits.clear();
        self.transition(RadioConnectionState::Disconnected, line, link);
    }

    fn collect<P: PacketSink>(&mut self, digit: Digit, line: &mut LineMachine, link: &mut P) {
        if self.digits.is_empty() && digit.value() == 0 {
            info!("Radio: voice dial");
            send(link, &Command::CallControl(CallAction::VoiceDial));
            self.transition(RadioConnectionState::CallInitiated, line, link);
            return;
        }

        // Dialing is entered with an empty accumulator and leaves at ten digits
        let _ = self.digits.push(digit);
        if !self.digits.is_full() {
            return;
        }

        let number: DialString = self.digits.iter().map(|d| d.as_ascii()).collect();
        info!(
            "Radio: dialing {}",
            core::str::from_utf8(&number).unwrap_or("?")
        );
        send(link, &Command::DialNumber(number));
        self.transition(RadioConnectionState::CallInitiated, line, link);
    }

    fn transition<P: PacketSink>(
        &mut self,
        next: RadioConnectionState,
        line: &mut LineMachine,
        link: &mut P,
    ) {
        info!("Radio: {} -> {}", self.state.label(), next.label());
        self.state = next;

        match next {
            RadioConnectionState::Disconnected => {
                self.reconnect_ticks = RECONNECT_TICKS;
                self.caller_id.clear();
                line.set_in_service(false);
                line.set_in_call(false);
                line.set_ring(false);
            }
            RadioConnectionState::ConnectedIdle => {
                self.caller_id.clear();
                line.set_in_service(true);
                line.set_in_call(false);
                line.set_ring(false);
            }
            RadioConnectionState::Dialing => {
                self.digits.clear();
            }
            RadioConnectionState::CallActive => {
                send(link, &Command::CallControl(CallAction::Gain));
                send(link, &Command::SpeakerGain(CALL_SPEAKER_GAIN));
                line.set_in_call(true);
                line.set_ring(false);
            }
            RadioConnectionState::CallReceived => {
                line.set_ring(true);
            }
            // Ringback and the voice assistant are passed through
            RadioConnectionState::CallInitiated | RadioConnectionState::CallOutgoing => {
                line.set_in_call(true);
            }
        }
    }
}

fn send<P: PacketSink>(link: &mut P, command: &Command) {
    if let Err(e) = link.send(&command.to_packet()) {
        warn!("Radio: send opcode {} failed: {}", command.opcode(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::opcode;

    #[derive(Default)]
    struct Sent(std::vec::Vec<Packet>);

    impl PacketSink for Sent {
        fn send(&mut self, packet: &Packet) -> crate::error::Result<()> {
            self.0.push(packet.clone());
            Ok(())
        }
    }

    fn status(opcode: u8, payload: &[u8]) -> Packet {
        Packet::new(opcode, payload).unwrap()
    }

    #[test]
    fn reconnect_after_window() {
        let mut radio = RadioMachine::new(PairingIndex::new(2).unwrap());
        let mut line = LineMachine::new();
        let mut sent = Sent::default();
        for _ in 0..RECONNECT_TICKS - 1 {
            radio.tick(&mut line, &mut sent);
        }
        assert!(sent.0.is_empty());
        radio.tick(&mut line, &mut sent);
        assert_eq!(sent.0, [Command::Connect(PairingIndex::new(2).unwrap()).to_packet()]);
        assert_eq!(radio.reconnect_ticks(), RECONNECT_TICKS);
    }

    #[test]
    fn link_up_puts_line_in_service() {
        let mut radio = RadioMachine::default();
        let mut line = LineMachine::new();
        let mut sent = Sent::default();
        radio.handle_packet(&status(opcode::LINK_STATUS, &[0x01]));
        radio.tick(&mut line, &mut sent);
        assert_eq!(radio.state(), RadioConnectionState::ConnectedIdle);
        assert!(line.in_service());

        radio.handle_packet(&status(opcode::LINK_STATUS, &[0x00]));
        radio.tick(&mut line, &mut sent);
        assert_eq!(radio.state(), RadioConnectionState::Disconnected);
        assert!(!line.in_service());
    }

    #[test]
    fn incoming_call_rings() {
        let mut radio = RadioMachine::default();
        let mut line = LineMachine::new();
        let mut sent = Sent::default();
        radio.handle_packet(&status(opcode::LINK_STATUS, &[0x01]));
        radio.tick(&mut line, &mut sent);
        radio.handle_packet(&status(opcode::CALLER_ID, b"5551234567"));
        radio.handle_packet(&status(opcode::CALL, &[0x00, 2]));
        radio.tick(&mut line, &mut sent);
        assert_eq!(radio.state(), RadioConnectionState::CallReceived);
        assert!(line.ring_requested());
        assert_eq!(radio.caller_id(), "5551234567");

        // Caller gave up
        radio.handle_packet(&status(opcode::CALL, &[0x00, 0]));
        radio.tick(&mut line, &mut sent);
        assert_eq!(radio.state(), RadioConnectionState::ConnectedIdle);
        assert!(!line.ring_requested());
        assert_eq!(radio.caller_id(), "");
    }

    #[test]
    fn pairing_enable_sent_once() {
        let mut radio = RadioMachine::default();
        let mut line = LineMachine::new();
        let mut sent = Sent::default();
        radio.request_pairing_enable();
        radio.tick(&mut line, &mut sent);
        radio.tick(&mut line, &mut sent);
        assert_eq!(sent.0, [Command::PairingEnable.to_packet()]);
    }
}
