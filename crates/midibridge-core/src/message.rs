//! Wire-side MIDI 1.0 messages and the constants that frame them.

use serde::{Deserialize, Serialize};

/// Status nibbles (high four bits of a status byte).
pub mod status {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const POLY_PRESSURE: u8 = 0xA0;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    pub const PITCH_BEND: u8 = 0xE0;
    pub const SYSTEM: u8 = 0xF0;
}

/// Centre of the unsigned 14-bit pitch-bend range.
pub const PITCH_BEND_CENTER: i32 = 8192;

/// Largest unsigned 14-bit wire value.
pub const PITCH_BEND_MAX: u16 = 0x3FFF;

#[inline]
pub fn is_status_byte(byte: u8) -> bool {
    byte & 0x80 != 0
}

/// Combine two 7-bit data bytes into an unsigned 14-bit value.
#[inline]
pub fn combine_14bit(lsb: u8, msb: u8) -> u16 {
    (lsb as u16 & 0x7F) | ((msb as u16 & 0x7F) << 7)
}

/// Split an unsigned 14-bit value into `(lsb, msb)` data bytes.
#[inline]
pub fn split_14bit(value: u16) -> (u8, u8) {
    ((value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8)
}

/// Unsigned wire bend (0..=16383) to signed bus bend (-8192..=8191).
#[inline]
pub fn bend_to_signed(bend: u16) -> i32 {
    bend as i32 - PITCH_BEND_CENTER
}

/// Signed bus bend to the unsigned wire quantity.
///
/// Only the low 14 bits survive, the same way the two data bytes would
/// truncate it on the wire. Out-of-range bus values wrap.
#[inline]
pub fn bend_to_wire(value: i32) -> u16 {
    (value.wrapping_add(PITCH_BEND_CENTER) as u16) & PITCH_BEND_MAX
}

/// Message class, independent of channel and payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusClass {
    NoteOn,
    NoteOff,
    PolyPressure,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
    SystemExclusive,
}

impl StatusClass {
    /// Class named by a status byte, before the velocity-zero alias is applied.
    ///
    /// Returns `None` for data bytes and for the system range (0xF0-0xFF).
    pub fn from_status(byte: u8) -> Option<Self> {
        match byte & 0xF0 {
            status::NOTE_OFF => Some(Self::NoteOff),
            status::NOTE_ON => Some(Self::NoteOn),
            status::POLY_PRESSURE => Some(Self::PolyPressure),
            status::CONTROL_CHANGE => Some(Self::ControlChange),
            status::PROGRAM_CHANGE => Some(Self::ProgramChange),
            status::CHANNEL_PRESSURE => Some(Self::ChannelPressure),
            status::PITCH_BEND => Some(Self::PitchBend),
            _ => None,
        }
    }

    /// Number of data bytes that follow the status byte on the wire.
    ///
    /// System Exclusive is variable length and reports `None`.
    pub fn data_len(self) -> Option<usize> {
        match self {
            Self::ProgramChange | Self::ChannelPressure => Some(1),
            Self::SystemExclusive => None,
            _ => Some(2),
        }
    }
}

/// A complete decoded wire message.
///
/// Channel-voice variants keep the raw 7-bit fields; pitch bend keeps the
/// unsigned 14-bit wire quantity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    PolyPressure { channel: u8, note: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    PitchBend { channel: u8, bend: u16 },
    SystemExclusive(Vec<u8>),
}

impl Message {
    pub fn class(&self) -> StatusClass {
        match self {
            Self::NoteOn { .. } => StatusClass::NoteOn,
            Self::NoteOff { .. } => StatusClass::NoteOff,
            Self::PolyPressure { .. } => StatusClass::PolyPressure,
            Self::ControlChange { .. } => StatusClass::ControlChange,
            Self::ProgramChange { .. } => StatusClass::ProgramChange,
            Self::ChannelPressure { .. } => StatusClass::ChannelPressure,
            Self::PitchBend { .. } => StatusClass::PitchBend,
            Self::SystemExclusive(_) => StatusClass::SystemExclusive,
        }
    }

    /// Channel 0-15, or `None` for System Exclusive.
    pub fn channel(&self) -> Option<u8> {
        match *self {
            Self::NoteOn { channel, .. }
            | Self::NoteOff { channel, .. }
            | Self::PolyPressure { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::ChannelPressure { channel, .. }
            | Self::PitchBend { channel, .. } => Some(channel),
            Self::SystemExclusive(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_detection() {
        assert!(is_status_byte(0x80));
        assert!(is_status_byte(0xFF));
        assert!(!is_status_byte(0x00));
        assert!(!is_status_byte(0x7F));
    }

    #[test]
    fn test_14bit_split_and_combine() {
        assert_eq!(combine_14bit(0x00, 0x40), 8192);
        assert_eq!(combine_14bit(0x7F, 0x7F), 16383);
        assert_eq!(split_14bit(8192), (0x00, 0x40));
        assert_eq!(split_14bit(16383), (0x7F, 0x7F));
        assert_eq!(split_14bit(0), (0x00, 0x00));
    }

    #[test]
    fn test_bend_rebias() {
        assert_eq!(bend_to_signed(0), -8192);
        assert_eq!(bend_to_signed(8192), 0);
        assert_eq!(bend_to_signed(16383), 8191);
        assert_eq!(bend_to_wire(-8192), 0);
        assert_eq!(bend_to_wire(0), 8192);
        assert_eq!(bend_to_wire(8191), 16383);
    }

    #[test]
    fn test_bend_to_wire_wraps_extremes() {
        assert_eq!(bend_to_wire(i32::MAX), 0x1FFF);
        assert_eq!(bend_to_wire(i32::MIN), 0x2000);
        assert_eq!(bend_to_wire(8192), 0);
        assert!(bend_to_wire(i32::MAX - 100) <= PITCH_BEND_MAX);
    }

    #[test]
    fn test_class_from_status() {
        assert_eq!(StatusClass::from_status(0x93), Some(StatusClass::NoteOn));
        assert_eq!(StatusClass::from_status(0x8F), Some(StatusClass::NoteOff));
        assert_eq!(StatusClass::from_status(0xC2), Some(StatusClass::ProgramChange));
        assert_eq!(StatusClass::from_status(0xF0), None);
        assert_eq!(StatusClass::from_status(0xF8), None);
        assert_eq!(StatusClass::from_status(0x40), None);
    }

    #[test]
    fn test_data_len() {
        assert_eq!(StatusClass::ProgramChange.data_len(), Some(1));
        assert_eq!(StatusClass::ChannelPressure.data_len(), Some(1));
        assert_eq!(StatusClass::PitchBend.data_len(), Some(2));
        assert_eq!(StatusClass::NoteOn.data_len(), Some(2));
        assert_eq!(StatusClass::SystemExclusive.data_len(), None);
    }

    #[test]
    fn test_message_channel() {
        let msg = Message::ControlChange {
            channel: 9,
            controller: 7,
            value: 100,
        };
        assert_eq!(msg.channel(), Some(9));
        assert_eq!(msg.class(), StatusClass::ControlChange);
        assert_eq!(Message::SystemExclusive(vec![0xF0, 0xF7]).channel(), None);
    }
}
