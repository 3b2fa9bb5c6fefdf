//! Bus-side events, as exchanged with the sequencer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequencer address of an event's sender.
///
/// Carried for diagnostics only; it never influences routing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub client: i32,
    pub port: i32,
}

impl Address {
    #[inline]
    pub fn new(client: i32, port: i32) -> Self {
        Self { client, port }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.client, self.port)
    }
}

/// Structured bus event.
///
/// `PitchBend::value` is signed (-8192..=8191), centred on zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// Polyphonic key pressure.
    KeyPressure { channel: u8, note: u8, pressure: u8 },
    Controller { channel: u8, param: u8, value: u8 },
    ProgramChange { channel: u8, value: u8 },
    ChannelPressure { channel: u8, value: u8 },
    PitchBend { channel: u8, value: i32 },
    SystemExclusive(Vec<u8>),
    /// Any bus event type the bridge does not translate. Holds the bus's
    /// own name for the type.
    Unsupported(String),
}

impl Event {
    #[inline]
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::NoteOn {
            channel,
            note,
            velocity,
        }
    }

    #[inline]
    pub fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::NoteOff {
            channel,
            note,
            velocity,
        }
    }

    #[inline]
    pub fn controller(channel: u8, param: u8, value: u8) -> Self {
        Self::Controller {
            channel,
            param,
            value,
        }
    }

    #[inline]
    pub fn program_change(channel: u8, value: u8) -> Self {
        Self::ProgramChange { channel, value }
    }

    #[inline]
    pub fn pitch_bend(channel: u8, value: i32) -> Self {
        Self::PitchBend { channel, value }
    }

    /// Short name used in diagnostics.
    pub fn kind(&self) -> &str {
        match self {
            Self::NoteOn { .. } => "note-on",
            Self::NoteOff { .. } => "note-off",
            Self::KeyPressure { .. } => "key-pressure",
            Self::Controller { .. } => "controller",
            Self::ProgramChange { .. } => "program-change",
            Self::ChannelPressure { .. } => "channel-pressure",
            Self::PitchBend { .. } => "pitch-bend",
            Self::SystemExclusive(_) => "sysex",
            Self::Unsupported(name) => name,
        }
    }

    #[inline]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

/// An event together with the address it was received from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Received {
    pub event: Event,
    pub source: Address,
}

impl Received {
    #[inline]
    pub fn new(event: Event, source: Address) -> Self {
        Self { event, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        assert_eq!(Address::new(128, 1).to_string(), "128:1");
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            Event::note_on(3, 60, 100),
            Event::NoteOn {
                channel: 3,
                note: 60,
                velocity: 100
            }
        );
        assert_eq!(
            Event::program_change(2, 5),
            Event::ProgramChange {
                channel: 2,
                value: 5
            }
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Event::pitch_bend(0, 0).kind(), "pitch-bend");
        assert_eq!(Event::Unsupported("Tempo".into()).kind(), "Tempo");
        assert!(!Event::Unsupported("Tempo".into()).is_supported());
        assert!(Event::SystemExclusive(vec![]).is_supported());
    }
}
