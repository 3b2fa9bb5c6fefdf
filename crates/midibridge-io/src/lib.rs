//! Endpoints for the serial MIDI bridge.
//!
//! - [`serial`]: raw-mode UART at MIDI baud, split into read/write halves.
//! - [`seq`]: ALSA sequencer client ports (feature `alsa-seq`, Linux only).
//!
//! Both implement the endpoint traits from `midibridge-core`.

pub mod error;
pub use error::{Error, Result};

#[cfg(unix)]
pub mod serial;
#[cfg(unix)]
pub use serial::{SerialConfig, SerialReader, SerialWriter, MIDI_BAUD};

#[cfg(all(target_os = "linux", feature = "alsa-seq"))]
pub mod seq;
#[cfg(all(target_os = "linux", feature = "alsa-seq"))]
pub use seq::{SeqConfig, SeqSink, SeqSource};
