//! Serial bytes in, bus events out.

use tracing::{debug, warn};

use super::{LoopState, LoopStats};
use crate::decoder::{Decoder, SingleByteMode};
use crate::endpoint::{ByteSource, EventSink};
use crate::error::{Error, Result};
use crate::mapper::to_event;
use crate::shutdown::Shutdown;

pub struct InboundLoop<S, K> {
    source: S,
    sink: K,
    decoder: Decoder,
    state: LoopState,
    stats: LoopStats,
}

impl<S: ByteSource, K: EventSink> InboundLoop<S, K> {
    pub fn new(source: S, sink: K, mode: SingleByteMode) -> Self {
        Self {
            source,
            sink,
            decoder: Decoder::new(mode),
            state: LoopState::Running,
            stats: LoopStats::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        LoopStats {
            desyncs: self.decoder.interrupted() + self.decoder.discarded(),
            ..self.stats
        }
    }

    #[inline]
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// One iteration: one read, at most one decoder feed, at most one emit.
    pub fn step(&mut self) -> Result<LoopState> {
        if self.state == LoopState::Terminated {
            return Ok(LoopState::Terminated);
        }

        let byte = match self.source.read_byte() {
            Ok(Some(byte)) => byte,
            Ok(None) => return Ok(LoopState::Running),
            Err(e) => return Err(self.terminate(e)),
        };
        self.stats.bytes_read += 1;
        debug!("[RX] {:02X}", byte);

        let Some(message) = self.decoder.feed(byte) else {
            return Ok(LoopState::Running);
        };

        let event = to_event(message);
        match self.sink.emit_event(event) {
            Ok(()) => self.stats.messages_emitted += 1,
            Err(Error::BusClosed) => return Err(self.terminate(Error::BusClosed)),
            Err(e) => warn!("Failed to emit event: {}", e),
        }
        Ok(LoopState::Running)
    }

    /// Step until shutdown is requested or an endpoint fails.
    pub fn run(&mut self, shutdown: &Shutdown) -> Result<LoopStats> {
        while self.state == LoopState::Running {
            if shutdown.is_requested() {
                debug!("Inbound loop shutting down");
                self.state = LoopState::Terminated;
                break;
            }
            self.step()?;
        }
        Ok(self.stats())
    }

    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }

    fn terminate(&mut self, error: Error) -> Error {
        self.state = LoopState::Terminated;
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::memory::{byte_channel, event_channel};

    #[test]
    fn test_note_on_scenario() {
        let (tx, source) = byte_channel();
        let (sink, rx) = event_channel();
        let mut inbound = InboundLoop::new(source, sink, SingleByteMode::Exact);

        for byte in [0x90, 0x40, 0x60] {
            tx.send(byte).unwrap();
            assert_eq!(inbound.step().unwrap(), LoopState::Running);
        }

        assert_eq!(rx.try_recv().unwrap(), Event::note_on(0, 0x40, 0x60));
        assert!(rx.try_recv().is_err());
        assert_eq!(inbound.stats().bytes_read, 3);
        assert_eq!(inbound.stats().messages_emitted, 1);
    }

    #[test]
    fn test_pitch_bend_scenario() {
        let (tx, source) = byte_channel();
        let (sink, rx) = event_channel();
        let mut inbound = InboundLoop::new(source, sink, SingleByteMode::Exact);

        for byte in [0xE0, 0x00, 0x40] {
            tx.send(byte).unwrap();
            inbound.step().unwrap();
        }

        assert_eq!(rx.try_recv().unwrap(), Event::pitch_bend(0, 0));
    }

    #[test]
    fn test_transport_closed_terminates() {
        let (tx, source) = byte_channel();
        let (sink, _rx) = event_channel();
        let mut inbound = InboundLoop::new(source, sink, SingleByteMode::Exact);

        drop(tx);
        assert!(matches!(inbound.step(), Err(Error::TransportClosed)));
        assert_eq!(inbound.state(), LoopState::Terminated);
        assert_eq!(inbound.step().unwrap(), LoopState::Terminated);
    }

    #[test]
    fn test_bus_closed_terminates() {
        let (tx, source) = byte_channel();
        let (sink, rx) = event_channel();
        let mut inbound = InboundLoop::new(source, sink, SingleByteMode::Exact);
        drop(rx);

        tx.send(0xC0).unwrap();
        tx.send(0x01).unwrap();
        inbound.step().unwrap();
        assert!(matches!(inbound.step(), Err(Error::BusClosed)));
        assert_eq!(inbound.state(), LoopState::Terminated);
    }

    #[test]
    fn test_run_stops_on_shutdown() {
        let (_tx, source) = byte_channel();
        let (sink, _rx) = event_channel();
        let mut inbound = InboundLoop::new(source, sink, SingleByteMode::Exact);

        let (trigger, shutdown) = Shutdown::new();
        trigger.trigger();
        let stats = inbound.run(&shutdown).unwrap();
        assert_eq!(stats, LoopStats::default());
        assert_eq!(inbound.state(), LoopState::Terminated);
    }

    #[test]
    fn test_desyncs_counted() {
        let (tx, source) = byte_channel();
        let (sink, _rx) = event_channel();
        let mut inbound = InboundLoop::new(source, sink, SingleByteMode::Exact);

        for byte in [0x90, 0x40, 0xF3, 0x01, 0x02] {
            tx.send(byte).unwrap();
            inbound.step().unwrap();
        }
        assert_eq!(inbound.stats().desyncs, 2);
        assert_eq!(inbound.stats().messages_emitted, 0);
    }
}
