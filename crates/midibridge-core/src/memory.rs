//! Channel-backed endpoints.
//!
//! Stand-ins for the serial port and the sequencer, for tests and for
//! embedding the bridge behind something other than ALSA. A closed peer maps
//! to [`Error::TransportClosed`] on the byte side and [`Error::BusClosed`] on
//! the event side.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::endpoint::{ByteSink, ByteSource, EventSink, EventSource};
use crate::error::{Error, Result};
use crate::event::{Event, Received};

const DEFAULT_POLL: Duration = Duration::from_millis(10);

pub struct ChannelByteSource {
    receiver: Receiver<u8>,
    poll: Duration,
}

impl ChannelByteSource {
    pub fn with_poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }
}

impl ByteSource for ChannelByteSource {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.receiver.recv_timeout(self.poll) {
            Ok(byte) => Ok(Some(byte)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::TransportClosed),
        }
    }
}

pub struct ChannelByteSink {
    sender: Sender<Vec<u8>>,
}

impl ByteSink for ChannelByteSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.sender
            .send(bytes.to_vec())
            .map_err(|_| Error::TransportClosed)
    }
}

pub struct ChannelEventSource {
    receiver: Receiver<Received>,
    poll: Duration,
}

impl ChannelEventSource {
    pub fn with_poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }
}

impl EventSource for ChannelEventSource {
    fn receive_event(&mut self) -> Result<Option<Received>> {
        match self.receiver.recv_timeout(self.poll) {
            Ok(received) => Ok(Some(received)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::BusClosed),
        }
    }
}

pub struct ChannelEventSink {
    sender: Sender<Event>,
}

impl EventSink for ChannelEventSink {
    fn emit_event(&mut self, event: Event) -> Result<()> {
        self.sender.send(event).map_err(|_| Error::BusClosed)
    }
}

/// Bytes pushed into the sender come out of the source, one per read.
pub fn byte_channel() -> (Sender<u8>, ChannelByteSource) {
    let (sender, receiver) = unbounded();
    (
        sender,
        ChannelByteSource {
            receiver,
            poll: DEFAULT_POLL,
        },
    )
}

/// Each `write_bytes` call arrives as one `Vec<u8>`.
pub fn write_channel() -> (ChannelByteSink, Receiver<Vec<u8>>) {
    let (sender, receiver) = unbounded();
    (ChannelByteSink { sender }, receiver)
}

/// Events pushed into the sender come out of the source.
pub fn received_channel() -> (Sender<Received>, ChannelEventSource) {
    let (sender, receiver) = unbounded();
    (
        sender,
        ChannelEventSource {
            receiver,
            poll: DEFAULT_POLL,
        },
    )
}

/// Emitted events arrive at the receiver.
pub fn event_channel() -> (ChannelEventSink, Receiver<Event>) {
    let (sender, receiver) = unbounded();
    (ChannelEventSink { sender }, receiver)
}
