//! Bus events in, serial bytes out.

use tracing::{debug, warn};

use super::{LoopState, LoopStats};
use crate::encoder::encode;
use crate::endpoint::{ByteSink, EventSource};
use crate::error::{Error, Result};
use crate::shutdown::Shutdown;
use crate::trace::HexBytes;

pub struct OutboundLoop<S, W> {
    source: S,
    sink: W,
    state: LoopState,
    stats: LoopStats,
}

impl<S: EventSource, W: ByteSink> OutboundLoop<S, W> {
    pub fn new(source: S, sink: W) -> Self {
        Self {
            source,
            sink,
            state: LoopState::Running,
            stats: LoopStats::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// One iteration: one receive, one encode, at most one write.
    pub fn step(&mut self) -> Result<LoopState> {
        if self.state == LoopState::Terminated {
            return Ok(LoopState::Terminated);
        }

        let received = match self.source.receive_event() {
            Ok(Some(received)) => received,
            Ok(None) => return Ok(LoopState::Running),
            // e.g. an input FIFO overrun: events were lost, the port is still usable
            Err(Error::Bus(message)) => {
                warn!("Failed to receive event: {}", message);
                return Ok(LoopState::Running);
            }
            Err(e) => return Err(self.terminate(e)),
        };
        self.stats.events_received += 1;

        if !received.event.is_supported() {
            self.stats.unsupported_events += 1;
            debug!(
                "[TX] {} -- Unsupported MIDI event type: {}",
                received.source,
                received.event.kind()
            );
            return Ok(LoopState::Running);
        }

        let bytes = encode(&received.event);
        if bytes.is_empty() {
            return Ok(LoopState::Running);
        }

        if let Err(e) = self.sink.write_bytes(&bytes) {
            return Err(self.terminate(e));
        }
        self.stats.messages_written += 1;
        self.stats.bytes_written += bytes.len() as u64;
        debug!("[TX] {} -- {}", received.source, HexBytes(&bytes));

        Ok(LoopState::Running)
    }

    /// Step until shutdown is requested or an endpoint fails.
    pub fn run(&mut self, shutdown: &Shutdown) -> Result<LoopStats> {
        while self.state == LoopState::Running {
            if shutdown.is_requested() {
                debug!("Outbound loop shutting down");
                self.state = LoopState::Terminated;
                break;
            }
            self.step()?;
        }
        Ok(self.stats)
    }

    pub fn into_parts(self) -> (S, W) {
        (self.source, self.sink)
    }

    fn terminate(&mut self, error: Error) -> Error {
        self.state = LoopState::Terminated;
        error
    }
}
