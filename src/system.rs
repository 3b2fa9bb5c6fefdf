//! Opening the real endpoints: the serial UART and the ALSA sequencer.

use midibridge_io::{serial, seq, SeqSink, SeqSource, SerialReader, SerialWriter};
use tracing::info;

use crate::bridge::{Bridge, Endpoints};
use crate::config::BridgeConfig;
use crate::error::Result;

pub type SystemBridge = Bridge<SerialReader, SerialWriter, SeqSource, SeqSink>;

/// Open the UART and register the sequencer ports described by `config`.
///
/// Nothing is left open on failure: handles opened before the failing step
/// are dropped on return.
pub fn open_system(config: &BridgeConfig) -> Result<SystemBridge> {
    config.validate()?;

    let (byte_source, byte_sink) = serial::open(&config.serial())?;
    let (event_source, event_sink) = seq::open(&config.seq())?;

    info!(
        device = %config.device.display(),
        baud = config.baud_rate,
        mode = ?config.single_byte_mode,
        "Bridge endpoints open"
    );

    Ok(Bridge::new(
        config,
        Endpoints {
            byte_source,
            byte_sink,
            event_source,
            event_sink,
        },
    ))
}
