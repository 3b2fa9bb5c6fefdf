//! # midibridge
//!
//! Bridges a raw serial MIDI 1.0 stream (a UART at 31250 baud) and the ALSA
//! sequencer, in both directions.
//!
//! - **midibridge-core** - wire decoder/encoder, event mapping, the two loops
//! - **midibridge-io** - serial UART and ALSA sequencer endpoints
//!
//! ## Embedding
//!
//! Any endpoints implementing the core traits can be bridged. With the
//! in-memory channels:
//!
//! ```
//! use midibridge::core::memory::{byte_channel, event_channel, received_channel, write_channel};
//! use midibridge::{Bridge, BridgeConfig, Endpoints};
//!
//! let (_bytes_in, byte_source) = byte_channel();
//! let (byte_sink, _bytes_out) = write_channel();
//! let (_events_in, event_source) = received_channel();
//! let (event_sink, _events_out) = event_channel();
//!
//! let bridge = Bridge::new(
//!     &BridgeConfig::default(),
//!     Endpoints { byte_source, byte_sink, event_source, event_sink },
//! );
//! bridge.shutdown_trigger().trigger();
//! let stats = bridge.run()?;
//! assert_eq!(stats.inbound.bytes_read, 0);
//! # Ok::<(), midibridge::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `alsa-seq` (default) - ALSA sequencer endpoints and [`open_system`]

/// Re-export of midibridge-core for direct access
pub use midibridge_core as core;
/// Re-export of midibridge-io for direct access
pub use midibridge_io as io;

pub use midibridge_core::{Event, LoopStats, Message, Shutdown, ShutdownTrigger, SingleByteMode};

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::BridgeConfig;

pub mod bridge;
pub use bridge::{Bridge, BridgeStats, Endpoints};

#[cfg(all(target_os = "linux", feature = "alsa-seq"))]
pub mod system;
#[cfg(all(target_os = "linux", feature = "alsa-seq"))]
pub use system::{open_system, SystemBridge};
