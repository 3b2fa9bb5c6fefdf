//! Conversion between sequencer events and bridge events.

use alsa::seq::{EvCtrl, EvNote, Event as SeqEvent, EventType};
use midibridge_core::Event;

fn note(channel: u8, note: u8, velocity: u8) -> EvNote {
    EvNote {
        channel,
        note,
        velocity,
        off_velocity: 0,
        duration: 0,
    }
}

fn ctrl(channel: u8, param: u32, value: i32) -> EvCtrl {
    EvCtrl {
        channel,
        param,
        value,
    }
}

/// `None` for events the sequencer side does not publish.
pub(super) fn to_alsa(event: &Event) -> Option<SeqEvent<'_>> {
    let ev = match *event {
        Event::NoteOn {
            channel,
            note: key,
            velocity,
        } => SeqEvent::new(EventType::Noteon, &note(channel, key, velocity)),
        Event::NoteOff {
            channel,
            note: key,
            velocity,
        } => SeqEvent::new(EventType::Noteoff, &note(channel, key, velocity)),
        Event::KeyPressure {
            channel,
            note: key,
            pressure,
        } => SeqEvent::new(EventType::Keypress, &note(channel, key, pressure)),
        Event::Controller {
            channel,
            param,
            value,
        } => SeqEvent::new(
            EventType::Controller,
            &ctrl(channel, param as u32, value as i32),
        ),
        Event::ProgramChange { channel, value } => {
            SeqEvent::new(EventType::Pgmchange, &ctrl(channel, 0, value as i32))
        }
        Event::ChannelPressure { channel, value } => {
            SeqEvent::new(EventType::Chanpress, &ctrl(channel, 0, value as i32))
        }
        Event::PitchBend { channel, value } => {
            SeqEvent::new(EventType::Pitchbend, &ctrl(channel, 0, value))
        }
        Event::SystemExclusive(ref bytes) => SeqEvent::new_ext(EventType::Sysex, bytes.as_slice()),
        Event::Unsupported(_) => return None,
    };
    Some(ev)
}

/// Sequencer fields wider than 7 bits are truncated to their low byte, the
/// same as the wire encoding would see them.
pub(super) fn from_alsa(ev: &SeqEvent<'_>) -> Event {
    let kind = ev.get_type();
    let converted = match kind {
        EventType::Noteon => ev.get_data::<EvNote>().map(|n| Event::NoteOn {
            channel: n.channel,
            note: n.note,
            velocity: n.velocity,
        }),
        EventType::Noteoff => ev.get_data::<EvNote>().map(|n| Event::NoteOff {
            channel: n.channel,
            note: n.note,
            velocity: n.velocity,
        }),
        EventType::Keypress => ev.get_data::<EvNote>().map(|n| Event::KeyPressure {
            channel: n.channel,
            note: n.note,
            pressure: n.velocity,
        }),
        EventType::Controller => ev.get_data::<EvCtrl>().map(|c| Event::Controller {
            channel: c.channel,
            param: c.param as u8,
            value: c.value as u8,
        }),
        EventType::Pgmchange => ev.get_data::<EvCtrl>().map(|c| Event::ProgramChange {
            channel: c.channel,
            value: c.value as u8,
        }),
        EventType::Chanpress => ev.get_data::<EvCtrl>().map(|c| Event::ChannelPressure {
            channel: c.channel,
            value: c.value as u8,
        }),
        EventType::Pitchbend => ev.get_data::<EvCtrl>().map(|c| Event::PitchBend {
            channel: c.channel,
            value: c.value,
        }),
        EventType::Sysex => ev.get_ext().map(|bytes| Event::SystemExclusive(bytes.to_vec())),
        _ => None,
    };
    converted.unwrap_or_else(|| Event::Unsupported(format!("{:?}", kind)))
}
