//! ALSA sequencer endpoints.
//!
//! Two sequencer handles are opened, one per bridge direction, so each loop
//! owns its bus endpoint outright:
//!
//! - [`SeqSink`]: output-only client with a readable "MIDI out" port.
//!   Events decoded from the UART go to its subscribers, unqueued.
//! - [`SeqSource`]: input-only, nonblocking client with a writable
//!   "MIDI in" port. Events sent to it are encoded onto the UART.
//!
//! Both handles close when dropped.

mod convert;

use std::ffi::{CStr, CString};
use std::time::Duration;

use alsa::seq::{PortCap, PortType, Seq};
use alsa::{Direction, PollDescriptors};
use midibridge_core::{Address, Event, EventSink, EventSource, Received};
use tracing::{debug, info};

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct SeqConfig {
    pub client_name: String,
    pub out_port_name: String,
    pub in_port_name: String,
    /// Longest a receive waits before reporting idle.
    pub poll_interval: Duration,
}

impl Default for SeqConfig {
    fn default() -> Self {
        Self {
            client_name: "midibridge".to_string(),
            out_port_name: "MIDI out".to_string(),
            in_port_name: "MIDI in".to_string(),
            poll_interval: Duration::from_millis(100),
        }
    }
}

fn c_name(name: &str) -> Result<CString> {
    CString::new(name).map_err(|_| Error::InvalidName(name.to_string()))
}

fn open_client(name: &CStr, direction: Direction, nonblock: bool) -> Result<(Seq, i32)> {
    let seq = Seq::open(None, Some(direction), nonblock)
        .map_err(Error::sequencer("open"))?;
    seq.set_client_name(name)
        .map_err(Error::sequencer("set client name"))?;
    let client = seq.client_id().map_err(Error::sequencer("query client id"))?;
    Ok((seq, client))
}

/// Register both sequencer clients and their ports.
pub fn open(config: &SeqConfig) -> Result<(SeqSource, SeqSink)> {
    let client_name = c_name(&config.client_name)?;
    let out_name = c_name(&config.out_port_name)?;
    let in_name = c_name(&config.in_port_name)?;

    let (out_seq, out_client) = open_client(&client_name, Direction::Playback, false)?;
    let out_port = out_seq
        .create_simple_port(
            &out_name,
            PortCap::READ | PortCap::SUBS_READ,
            PortType::MIDI_GENERIC | PortType::APPLICATION,
        )
        .map_err(Error::sequencer("create output port"))?;

    let (in_seq, in_client) = open_client(&client_name, Direction::Capture, true)?;
    let in_port = in_seq
        .create_simple_port(
            &in_name,
            PortCap::WRITE | PortCap::SUBS_WRITE,
            PortType::MIDI_GENERIC | PortType::APPLICATION,
        )
        .map_err(Error::sequencer("create input port"))?;

    let out_addr = Address::new(out_client, out_port);
    let in_addr = Address::new(in_client, in_port);
    info!(
        client = %config.client_name,
        out_port = %out_addr,
        in_port = %in_addr,
        "ALSA sequencer ports ready"
    );

    Ok((
        SeqSource::new(in_seq, in_addr, config.poll_interval),
        SeqSink::new(out_seq, out_addr),
    ))
}

/// Emit side: publishes events from the "MIDI out" port.
pub struct SeqSink {
    seq: Seq,
    addr: Address,
}

impl SeqSink {
    fn new(seq: Seq, addr: Address) -> Self {
        Self { seq, addr }
    }

    pub fn address(&self) -> Address {
        self.addr
    }
}

impl EventSink for SeqSink {
    fn emit_event(&mut self, event: Event) -> midibridge_core::Result<()> {
        let Some(mut ev) = convert::to_alsa(&event) else {
            debug!("Not emitting unsupported event: {}", event.kind());
            return Ok(());
        };
        ev.set_source(self.addr.port);
        ev.set_subs();
        ev.set_direct();
        self.seq
            .event_output_direct(&mut ev)
            .map_err(|e| midibridge_core::Error::Bus(e.to_string()))?;
        Ok(())
    }
}

/// Receive side: events written to the "MIDI in" port.
pub struct SeqSource {
    seq: Seq,
    addr: Address,
    poll_ms: i32,
}

impl SeqSource {
    fn new(seq: Seq, addr: Address, poll_interval: Duration) -> Self {
        Self {
            seq,
            addr,
            poll_ms: poll_interval.as_millis().min(i32::MAX as u128) as i32,
        }
    }

    pub fn address(&self) -> Address {
        self.addr
    }
}

fn bus_error(e: alsa::Error) -> midibridge_core::Error {
    midibridge_core::Error::Bus(e.to_string())
}

impl EventSource for SeqSource {
    fn receive_event(&mut self) -> midibridge_core::Result<Option<Received>> {
        let mut input = self.seq.input();

        if input.event_input_pending(true).map_err(bus_error)? == 0 {
            let mut fds = (&self.seq, Some(Direction::Capture))
                .get()
                .map_err(bus_error)?;
            if alsa::poll::poll(&mut fds, self.poll_ms).map_err(bus_error)? == 0 {
                return Ok(None);
            }
            if input.event_input_pending(true).map_err(bus_error)? == 0 {
                return Ok(None);
            }
        }

        let ev = input.event_input().map_err(bus_error)?;
        let source = ev.get_source();
        Ok(Some(Received::new(
            convert::from_alsa(&ev),
            Address::new(source.client, source.port),
        )))
    }
}
