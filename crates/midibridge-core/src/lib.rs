//! Protocol core for the serial MIDI bridge.
//!
//! Decodes an unframed MIDI 1.0 byte stream into messages, maps them onto
//! bus events, and encodes bus events back into wire bytes. The two bridge
//! directions run as independent loops over the endpoint traits, so any
//! transport or bus can be plugged in.
//!
//! # Example
//!
//! ```
//! use midibridge_core::{encode, Decoder, Event, SingleByteMode};
//!
//! let mut decoder = Decoder::new(SingleByteMode::Exact);
//! let messages: Vec<_> = [0x90, 0x40, 0x60]
//!     .into_iter()
//!     .filter_map(|b| decoder.feed(b))
//!     .collect();
//! assert_eq!(messages.len(), 1);
//!
//! let bytes = encode(&Event::program_change(2, 5));
//! assert_eq!(bytes.as_slice(), &[0xC2, 0x05]);
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod message;
pub use message::{Message, StatusClass};

pub(crate) mod event;
pub use event::{Address, Event, Received};

pub(crate) mod decoder;
pub use decoder::{Decoder, ParserState, SingleByteMode};

pub(crate) mod encoder;
pub use encoder::{encode, WireBytes};

pub(crate) mod mapper;
pub use mapper::to_event;

pub(crate) mod endpoint;
pub use endpoint::{ByteSink, ByteSource, EventSink, EventSource};

pub(crate) mod shutdown;
pub use shutdown::{Shutdown, ShutdownTrigger};

pub mod pipeline;
pub use pipeline::{InboundLoop, LoopState, LoopStats, OutboundLoop};

pub mod memory;

pub(crate) mod trace;
pub use trace::HexBytes;
