//! Two-thread bridge runner.
//!
//! The inbound loop (UART → bus) runs on a dedicated thread, the outbound
//! loop (bus → UART) on the caller's. Whichever loop stops first, for
//! shutdown or failure, stops the other through the shared shutdown flag.

use std::thread;

use midibridge_core::{
    ByteSink, ByteSource, EventSink, EventSource, InboundLoop, LoopStats, OutboundLoop, Shutdown,
    ShutdownTrigger,
};
use tracing::{error, info};

use crate::config::BridgeConfig;
use crate::error::{Error, Result};

pub const INBOUND_THREAD_NAME: &str = "midibridge-inbound";

/// The four endpoint halves a bridge moves into its loops.
pub struct Endpoints<BS, BK, ES, EK> {
    /// UART receive side.
    pub byte_source: BS,
    /// UART transmit side.
    pub byte_sink: BK,
    /// Bus receive side ("MIDI in").
    pub event_source: ES,
    /// Bus emit side ("MIDI out").
    pub event_sink: EK,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub inbound: LoopStats,
    pub outbound: LoopStats,
}

pub struct Bridge<BS, BK, ES, EK> {
    inbound: InboundLoop<BS, EK>,
    outbound: OutboundLoop<ES, BK>,
    trigger: ShutdownTrigger,
    shutdown: Shutdown,
}

impl<BS, BK, ES, EK> Bridge<BS, BK, ES, EK>
where
    BS: ByteSource + Send + 'static,
    BK: ByteSink,
    ES: EventSource,
    EK: EventSink + Send + 'static,
{
    pub fn new(config: &BridgeConfig, endpoints: Endpoints<BS, BK, ES, EK>) -> Self {
        let Endpoints {
            byte_source,
            byte_sink,
            event_source,
            event_sink,
        } = endpoints;
        let (trigger, shutdown) = Shutdown::new();
        Self {
            inbound: InboundLoop::new(byte_source, event_sink, config.single_byte_mode),
            outbound: OutboundLoop::new(event_source, byte_sink),
            trigger,
            shutdown,
        }
    }

    /// Handle that stops both loops. Hand it to a signal handler or keep
    /// it to stop an embedded bridge.
    pub fn shutdown_trigger(&self) -> ShutdownTrigger {
        self.trigger.clone()
    }

    /// Run both directions until shutdown or the first endpoint failure.
    ///
    /// Returns the loop counters on a clean stop, or the error of the loop
    /// that failed. A failure in one direction also stops the other.
    pub fn run(self) -> Result<BridgeStats> {
        let Bridge {
            mut inbound,
            mut outbound,
            trigger,
            shutdown,
        } = self;

        let inbound_shutdown = shutdown.clone();
        let inbound_trigger = trigger.clone();
        let handle = thread::Builder::new()
            .name(INBOUND_THREAD_NAME.to_string())
            .spawn(move || {
                // fires on return and on unwind
                let _stop_outbound = TriggerOnExit(inbound_trigger);
                let result = inbound.run(&inbound_shutdown);
                if let Err(ref e) = result {
                    error!("Inbound loop failed: {}", e);
                }
                (inbound.stats(), result.map(|_| ()))
            })?;

        let outbound_result = outbound.run(&shutdown);
        if let Err(ref e) = outbound_result {
            error!("Outbound loop failed: {}", e);
        }
        trigger.trigger();

        let (inbound_stats, inbound_result) = handle
            .join()
            .map_err(|_| Error::Thread(format!("{} panicked", INBOUND_THREAD_NAME)))?;

        let stats = BridgeStats {
            inbound: inbound_stats,
            outbound: outbound.stats(),
        };
        log_stats(&stats);

        inbound_result?;
        outbound_result?;
        Ok(stats)
    }
}

/// Requests shutdown when dropped.
struct TriggerOnExit(ShutdownTrigger);

impl Drop for TriggerOnExit {
    fn drop(&mut self) {
        self.0.trigger();
    }
}

fn log_stats(stats: &BridgeStats) {
    info!(
        bytes_read = stats.inbound.bytes_read,
        messages_emitted = stats.inbound.messages_emitted,
        desyncs = stats.inbound.desyncs,
        "Inbound loop stopped"
    );
    info!(
        events_received = stats.outbound.events_received,
        messages_written = stats.outbound.messages_written,
        bytes_written = stats.outbound.bytes_written,
        unsupported_events = stats.outbound.unsupported_events,
        "Outbound loop stopped"
    );
}
