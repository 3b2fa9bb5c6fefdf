//! Error types for the bridge core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte transport reached end-of-stream or its peer went away.
    #[error("Transport closed")]
    TransportClosed,

    /// The event bus endpoint went away.
    #[error("Event bus closed")]
    BusClosed,

    #[error("Event bus error: {0}")]
    Bus(String),
}

pub type Result<T> = std::result::Result<T, Error>;
