//! Bus event to wire bytes.

use smallvec::{smallvec, SmallVec};

use crate::event::Event;
use crate::message::{bend_to_wire, split_14bit, status};

/// Encoded wire bytes. Channel-voice messages stay on the stack; System
/// Exclusive spills to the heap.
pub type WireBytes = SmallVec<[u8; 3]>;

#[inline]
fn status_byte(nibble: u8, channel: u8) -> u8 {
    nibble | (channel & 0x0F)
}

#[inline]
fn data(byte: u8) -> u8 {
    byte & 0x7F
}

/// Serialize one bus event.
///
/// Returns an empty buffer for [`Event::Unsupported`]; callers skip the
/// write in that case.
pub fn encode(event: &Event) -> WireBytes {
    match *event {
        Event::NoteOn {
            channel,
            note,
            velocity,
        } => smallvec![
            status_byte(status::NOTE_ON, channel),
            data(note),
            data(velocity)
        ],
        Event::NoteOff {
            channel,
            note,
            velocity,
        } => smallvec![
            status_byte(status::NOTE_OFF, channel),
            data(note),
            data(velocity)
        ],
        Event::KeyPressure {
            channel,
            note,
            pressure,
        } => smallvec![
            status_byte(status::POLY_PRESSURE, channel),
            data(note),
            data(pressure)
        ],
        Event::Controller {
            channel,
            param,
            value,
        } => smallvec![
            status_byte(status::CONTROL_CHANGE, channel),
            data(param),
            data(value)
        ],
        Event::ProgramChange { channel, value } => {
            smallvec![status_byte(status::PROGRAM_CHANGE, channel), data(value)]
        }
        Event::ChannelPressure { channel, value } => {
            smallvec![status_byte(status::CHANNEL_PRESSURE, channel), data(value)]
        }
        Event::PitchBend { channel, value } => {
            let (lsb, msb) = split_14bit(bend_to_wire(value));
            smallvec![status_byte(status::PITCH_BEND, channel), lsb, msb]
        }
        Event::SystemExclusive(ref bytes) => SmallVec::from_slice(bytes),
        Event::Unsupported(_) => SmallVec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on() {
        assert_eq!(encode(&Event::note_on(0, 60, 100)).as_slice(), &[0x90, 60, 100]);
        assert_eq!(encode(&Event::note_on(15, 0, 1)).as_slice(), &[0x9F, 0, 1]);
    }

    #[test]
    fn test_note_off() {
        assert_eq!(encode(&Event::note_off(1, 60, 64)).as_slice(), &[0x81, 60, 64]);
    }

    #[test]
    fn test_key_pressure() {
        let event = Event::KeyPressure {
            channel: 9,
            note: 36,
            pressure: 80,
        };
        assert_eq!(encode(&event).as_slice(), &[0xA9, 36, 80]);
    }

    #[test]
    fn test_controller() {
        assert_eq!(encode(&Event::controller(0, 7, 127)).as_slice(), &[0xB0, 7, 127]);
    }

    #[test]
    fn test_program_change_two_bytes() {
        assert_eq!(encode(&Event::program_change(2, 5)).as_slice(), &[0xC2, 0x05]);
    }

    #[test]
    fn test_channel_pressure_two_bytes() {
        let event = Event::ChannelPressure {
            channel: 3,
            value: 90,
        };
        assert_eq!(encode(&event).as_slice(), &[0xD3, 90]);
    }

    #[test]
    fn test_pitch_bend_extremes() {
        assert_eq!(encode(&Event::pitch_bend(0, 0)).as_slice(), &[0xE0, 0x00, 0x40]);
        assert_eq!(encode(&Event::pitch_bend(0, -8192)).as_slice(), &[0xE0, 0x00, 0x00]);
        assert_eq!(encode(&Event::pitch_bend(1, 8191)).as_slice(), &[0xE1, 0x7F, 0x7F]);
    }

    #[test]
    fn test_pitch_bend_out_of_range_wraps() {
        assert_eq!(
            encode(&Event::pitch_bend(0, i32::MAX)).as_slice(),
            &[0xE0, 0x7F, 0x3F]
        );
        assert_eq!(
            encode(&Event::pitch_bend(0, i32::MIN)).as_slice(),
            &[0xE0, 0x00, 0x40]
        );
    }

    #[test]
    fn test_sysex_passthrough() {
        let raw = vec![0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7];
        let bytes = encode(&Event::SystemExclusive(raw.clone()));
        assert_eq!(bytes.as_slice(), raw.as_slice());
        assert!(bytes.spilled());
    }

    #[test]
    fn test_unsupported_is_empty() {
        assert!(encode(&Event::Unsupported("Tempo".into())).is_empty());
    }

    #[test]
    fn test_data_bytes_never_carry_status_bit() {
        let bytes = encode(&Event::note_on(0, 0xFF, 0x80));
        assert_eq!(bytes.as_slice(), &[0x90, 0x7F, 0x00]);

        let bytes = encode(&Event::controller(200, 0x90, 0xFF));
        assert_eq!(bytes[0], 0xB8);
        assert!(bytes[1..].iter().all(|b| *b < 0x80));
    }
}
