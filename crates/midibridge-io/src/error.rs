//! Error types for the serial and sequencer endpoints.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serial {context}: {source}")]
    Serial {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported baud rate: {0}")]
    UnsupportedBaud(u32),

    #[error("Sequencer {context}: {message}")]
    Sequencer {
        context: &'static str,
        message: String,
    },

    #[error("Invalid port or client name: {0:?}")]
    InvalidName(String),

    #[error(transparent)]
    Core(#[from] midibridge_core::Error),
}

impl Error {
    pub(crate) fn serial(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Serial {
            context: context.into(),
            source,
        }
    }
}

#[cfg(all(target_os = "linux", feature = "alsa-seq"))]
impl Error {
    pub(crate) fn sequencer(context: &'static str) -> impl FnOnce(alsa::Error) -> Self {
        move |e| Error::Sequencer {
            context,
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
