//! Byte-at-a-time MIDI 1.0 decoder.
//!
//! Rebuilds channel-voice messages from an unframed serial byte stream.
//! Any status byte resynchronizes the parser, so a message interrupted
//! by a new status byte is dropped rather than spliced into the next one.
//! There is no running status: data bytes seen while waiting for a status
//! byte are ignored.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::message::{combine_14bit, is_status_byte, status, Message};

/// How Program Change and Channel Pressure (one data byte each) complete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingleByteMode {
    /// Complete after the status byte and its single data byte.
    #[default]
    Exact,
    /// Wait for a second data byte and swallow it with the message.
    ///
    /// Matches bridges that always buffer three bytes per message, for
    /// controllers that pad short messages.
    Absorb,
}

/// Decoder position between byte arrivals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParserState {
    #[default]
    AwaitingStatus,
    AwaitingData1,
    AwaitingData2,
}

/// Stateful wire decoder. Owned by a single inbound loop.
#[derive(Debug, Default)]
pub struct Decoder {
    mode: SingleByteMode,
    state: ParserState,
    buffer: [u8; 3],
    interrupted: u64,
    discarded: u64,
}

impl Decoder {
    pub fn new(mode: SingleByteMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[inline]
    pub fn mode(&self) -> SingleByteMode {
        self.mode
    }

    #[inline]
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Partial messages dropped because a new status byte arrived.
    #[inline]
    pub fn interrupted(&self) -> u64 {
        self.interrupted
    }

    /// Completed byte groups dropped for an unhandled status nibble.
    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Forget any partial message.
    pub fn reset(&mut self) {
        self.state = ParserState::AwaitingStatus;
    }

    /// Consume one byte. Returns a message once enough bytes have arrived
    /// for the current status class.
    pub fn feed(&mut self, byte: u8) -> Option<Message> {
        if is_status_byte(byte) {
            if self.state != ParserState::AwaitingStatus {
                self.interrupted += 1;
                trace!(
                    dropped = format_args!("{:02X}", self.buffer[0]),
                    status = format_args!("{:02X}", byte),
                    "Partial message interrupted by status byte"
                );
            }
            self.buffer[0] = byte;
            self.state = ParserState::AwaitingData1;
            return None;
        }

        match self.state {
            ParserState::AwaitingStatus => None,
            ParserState::AwaitingData1 => {
                self.buffer[1] = byte;
                if self.mode == SingleByteMode::Exact && self.expects_one_data_byte() {
                    self.state = ParserState::AwaitingStatus;
                    return self.complete();
                }
                self.state = ParserState::AwaitingData2;
                None
            }
            ParserState::AwaitingData2 => {
                self.buffer[2] = byte;
                self.state = ParserState::AwaitingStatus;
                self.complete()
            }
        }
    }

    fn expects_one_data_byte(&self) -> bool {
        matches!(
            self.buffer[0] & 0xF0,
            status::PROGRAM_CHANGE | status::CHANNEL_PRESSURE
        )
    }

    fn complete(&mut self) -> Option<Message> {
        let [status_byte, data1, data2] = self.buffer;
        let channel = status_byte & 0x0F;

        let message = match status_byte & 0xF0 {
            status::NOTE_ON if data2 > 0 => Message::NoteOn {
                channel,
                note: data1,
                velocity: data2,
            },
            status::NOTE_ON | status::NOTE_OFF => Message::NoteOff {
                channel,
                note: data1,
                velocity: data2,
            },
            status::POLY_PRESSURE => Message::PolyPressure {
                channel,
                note: data1,
                pressure: data2,
            },
            status::CONTROL_CHANGE => Message::ControlChange {
                channel,
                controller: data1,
                value: data2,
            },
            status::PROGRAM_CHANGE => Message::ProgramChange {
                channel,
                program: data1,
            },
            status::CHANNEL_PRESSURE => Message::ChannelPressure {
                channel,
                pressure: data1,
            },
            status::PITCH_BEND => Message::PitchBend {
                channel,
                bend: combine_14bit(data1, data2),
            },
            _ => {
                self.discarded += 1;
                trace!(
                    status = format_args!("{:02X}", status_byte),
                    "Discarding message with unhandled status"
                );
                return None;
            }
        };
        Some(message)
    }
}
