//! Radio connection and call states
//!
//! [`RadioConnectionState`] is owned by the connection machine;
//! [`CallState`] mirrors what the handsfree module last reported.

use core::fmt;

/// Connection/call state of the radio machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RadioConnectionState {
    /// No handsfree link
    #[default]
    Disconnected,
    /// Linked, no call, handset on-hook
    ConnectedIdle,
    /// Handset lifted, collecting digits
    Dialing,
    /// Call in progress with audio
    CallActive,
    /// Dial or voice-dial command sent, waiting for the phone
    CallInitiated,
    /// Phone reports the outgoing call is ringing out
    CallOutgoing,
    /// Incoming call, line ringing
    CallReceived,
}

impl RadioConnectionState {
    /// Human-readable label for transition logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::ConnectedIdle => "ConnectedIdle",
            Self::Dialing => "Dialing",
            Self::CallActive => "CallActive",
            Self::CallInitiated => "CallInitiated",
            Self::CallOutgoing => "CallOutgoing",
            Self::CallReceived => "CallReceived",
        }
    }
}

impl fmt::Display for RadioConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioConnectionState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.label());
    }
}

/// Call status reported by the handsfree module
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CallState {
    /// No call
    #[default]
    Idle,
    /// Voice assistant active
    VoiceDial,
    /// Incoming call alerting
    Incoming,
    /// Outgoing call alerting
    Outgoing,
    /// Call connected
    Active,
}

impl CallState {
    /// Decode the status code of a call-status frame
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Idle),
            1 => Some(Self::VoiceDial),
            2 => Some(Self::Incoming),
            3 => Some(Self::Outgoing),
            4 => Some(Self::Active),
            _ => None,
        }
    }

    /// Human-readable label for logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::VoiceDial => "VoiceDial",
            Self::Incoming => "Incoming",
            Self::Outgoing => "Outgoing",
            Self::Active => "Active",
        }
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for CallState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.label());
    }
}
