//! Seams between the pipelines and the outside world.
//!
//! Reads wait at most one poll interval and report idleness with `Ok(None)`,
//! so a loop can notice a shutdown request between blocking calls.

use crate::error::Result;
use crate::event::{Event, Received};

/// Read side of the byte transport.
pub trait ByteSource {
    /// Next byte, or `None` if nothing arrived within the poll interval.
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// Write side of the byte transport.
pub trait ByteSink {
    /// Write the whole buffer or fail.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Receive side of the event bus.
pub trait EventSource {
    /// Next event and its sender, or `None` if the bus was idle for the
    /// poll interval.
    fn receive_event(&mut self) -> Result<Option<Received>>;
}

/// Emit side of the event bus.
pub trait EventSink {
    /// Hand an event to the bus. Delivery is the bus's responsibility.
    fn emit_event(&mut self, event: Event) -> Result<()>;
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }
}

impl<T: ByteSink + ?Sized> ByteSink for Box<T> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }
}

impl<T: EventSource + ?Sized> EventSource for Box<T> {
    fn receive_event(&mut self) -> Result<Option<Received>> {
        (**self).receive_event()
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit_event(&mut self, event: Event) -> Result<()> {
        (**self).emit_event(event)
    }
}
