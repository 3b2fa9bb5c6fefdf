//! Decoded wire message to bus event.

use crate::event::Event;
use crate::message::{bend_to_signed, Message};

/// Translate a decoded message into the bus representation.
///
/// Field values come from 7-bit wire fields and need no validation.
pub fn to_event(message: Message) -> Event {
    match message {
        Message::NoteOn {
            channel,
            note,
            velocity,
        } => Event::NoteOn {
            channel,
            note,
            velocity,
        },
        Message::NoteOff {
            channel,
            note,
            velocity,
        } => Event::NoteOff {
            channel,
            note,
            velocity,
        },
        Message::PolyPressure {
            channel,
            note,
            pressure,
        } => Event::KeyPressure {
            channel,
            note,
            pressure,
        },
        Message::ControlChange {
            channel,
            controller,
            value,
        } => Event::Controller {
            channel,
            param: controller,
            value,
        },
        Message::ProgramChange { channel, program } => Event::ProgramChange {
            channel,
            value: program,
        },
        Message::ChannelPressure { channel, pressure } => Event::ChannelPressure {
            channel,
            value: pressure,
        },
        Message::PitchBend { channel, bend } => Event::PitchBend {
            channel,
            value: bend_to_signed(bend),
        },
        Message::SystemExclusive(bytes) => Event::SystemExclusive(bytes),
    }
}

impl From<Message> for Event {
    fn from(message: Message) -> Self {
        to_event(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_fields_carried() {
        let event = to_event(Message::NoteOn {
            channel: 4,
            note: 61,
            velocity: 99,
        });
        assert_eq!(event, Event::note_on(4, 61, 99));
    }

    #[test]
    fn test_poly_pressure_becomes_key_pressure() {
        let event = to_event(Message::PolyPressure {
            channel: 0,
            note: 48,
            pressure: 12,
        });
        assert_eq!(
            event,
            Event::KeyPressure {
                channel: 0,
                note: 48,
                pressure: 12
            }
        );
    }

    #[test]
    fn test_pitch_bend_rebiased() {
        let event: Event = Message::PitchBend {
            channel: 2,
            bend: 0,
        }
        .into();
        assert_eq!(event, Event::pitch_bend(2, -8192));

        let event = to_event(Message::PitchBend {
            channel: 2,
            bend: 16383,
        });
        assert_eq!(event, Event::pitch_bend(2, 8191));
    }

    #[test]
    fn test_single_byte_classes() {
        assert_eq!(
            to_event(Message::ProgramChange {
                channel: 1,
                program: 42
            }),
            Event::program_change(1, 42)
        );
        assert_eq!(
            to_event(Message::ChannelPressure {
                channel: 1,
                pressure: 42
            }),
            Event::ChannelPressure {
                channel: 1,
                value: 42
            }
        );
    }

    #[test]
    fn test_sysex_forwarded_unopened() {
        let raw = vec![0xF0, 0x43, 0x10, 0xF7];
        assert_eq!(
            to_event(Message::SystemExclusive(raw.clone())),
            Event::SystemExclusive(raw)
        );
    }
}
