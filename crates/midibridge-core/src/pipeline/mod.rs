//! The two bridge directions.
//!
//! Each loop owns its source and sink by value, so neither direction can
//! reach the other's endpoints. A loop is `Running` until its transport or
//! bus fails, or until a [`Shutdown`](crate::Shutdown) request is seen
//! between two blocking calls.

mod inbound;
mod outbound;

pub use inbound::InboundLoop;
pub use outbound::OutboundLoop;

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum LoopState {
    #[default]
    Running,
    Terminated,
}

/// Counters kept by a loop over its lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub bytes_read: u64,
    pub messages_emitted: u64,
    /// Partial messages dropped on resync plus byte groups with an
    /// unhandled status.
    pub desyncs: u64,
    pub events_received: u64,
    pub messages_written: u64,
    pub bytes_written: u64,
    pub unsupported_events: u64,
}
