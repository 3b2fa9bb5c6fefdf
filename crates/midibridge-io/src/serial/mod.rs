//! Raw-mode serial UART transport.
//!
//! The device is opened once, configured, and split into an owned read half
//! and an owned write half over duplicated descriptors, one per bridge
//! direction. Both halves close their descriptor on drop.

mod termios;

#[cfg(target_os = "linux")]
mod custom_baud;

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use midibridge_core::{ByteSink, ByteSource};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// MIDI 1.0 DIN/UART line rate.
pub const MIDI_BAUD: u32 = 31_250;

const READ_CHUNK: usize = 64;

#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub device: PathBuf,
    pub baud_rate: u32,
    /// Longest a read waits before reporting idle.
    pub poll_interval: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/serial0"),
            baud_rate: MIDI_BAUD,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Open and configure the UART, returning its read and write halves.
pub fn open(config: &SerialConfig) -> Result<(SerialReader, SerialWriter)> {
    let device = config.device.display().to_string();

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(&config.device)
        .map_err(|e| Error::serial(format!("open {}", device), e))?;
    debug!("Opened serial device: {}", device);

    configure(&file, config.baud_rate, &device)?;

    let write_half = file
        .try_clone()
        .map_err(|e| Error::serial(format!("duplicate {}", device), e))?;

    info!(device = %device, baud = config.baud_rate, "Serial port ready");

    Ok((
        SerialReader::new(file, &config.device, config.poll_interval),
        SerialWriter::new(write_half, &config.device),
    ))
}

fn configure(file: &File, baud: u32, device: &str) -> Result<()> {
    let fd = file.as_raw_fd();

    if let Some(speed) = termios::standard_speed(baud) {
        return termios::configure_raw(fd, speed)
            .map_err(|e| Error::serial(format!("configure {}", device), e));
    }

    // Non-standard rates ride on B38400 plus a driver divisor
    termios::configure_raw(fd, libc::B38400)
        .map_err(|e| Error::serial(format!("configure {}", device), e))?;
    apply_custom_baud(fd, baud, device)
}

#[cfg(target_os = "linux")]
fn apply_custom_baud(fd: std::os::unix::io::RawFd, baud: u32, device: &str) -> Result<()> {
    let actual = custom_baud::apply(fd, baud)
        .map_err(|e| Error::serial(format!("set custom baud on {}", device), e))?;
    if actual != baud {
        warn!(requested = baud, actual, "UART clock cannot hit baud rate exactly");
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn apply_custom_baud(_fd: std::os::unix::io::RawFd, baud: u32, _device: &str) -> Result<()> {
    Err(Error::UnsupportedBaud(baud))
}

/// Read half. Buffers whatever the driver has ready and hands it out one
/// byte at a time.
pub struct SerialReader {
    file: File,
    device: PathBuf,
    poll_ms: libc::c_int,
    buf: [u8; READ_CHUNK],
    pos: usize,
    len: usize,
}

impl SerialReader {
    fn new(file: File, device: &Path, poll_interval: Duration) -> Self {
        Self {
            file,
            device: device.to_path_buf(),
            poll_ms: poll_interval.as_millis().min(libc::c_int::MAX as u128) as libc::c_int,
            buf: [0; READ_CHUNK],
            pos: 0,
            len: 0,
        }
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    /// Wait up to the poll interval for input. `Ok(false)` on timeout.
    fn wait_readable(&self) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: pfd is a single valid pollfd for the duration of the call.
        let ready = unsafe { libc::poll(&mut pfd, 1, self.poll_ms) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err);
        }
        Ok(ready > 0)
    }

    fn fill(&mut self) -> midibridge_core::Result<bool> {
        if !self.wait_readable()? {
            return Ok(false);
        }
        match self.file.read(&mut self.buf) {
            Ok(0) => Err(midibridge_core::Error::TransportClosed),
            Ok(n) => {
                self.pos = 0;
                self.len = n;
                Ok(true)
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                ) =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ByteSource for SerialReader {
    fn read_byte(&mut self) -> midibridge_core::Result<Option<u8>> {
        if self.pos == self.len && !self.fill()? {
            return Ok(None);
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }
}

/// Write half.
pub struct SerialWriter {
    file: File,
    device: PathBuf,
}

impl SerialWriter {
    fn new(file: File, device: &Path) -> Self {
        Self {
            file,
            device: device.to_path_buf(),
        }
    }

    pub fn device(&self) -> &Path {
        &self.device
    }
}

impl ByteSink for SerialWriter {
    fn write_bytes(&mut self, bytes: &[u8]) -> midibridge_core::Result<()> {
        self.file.write_all(bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SerialConfig::default();
        assert_eq!(config.device, PathBuf::from("/dev/serial0"));
        assert_eq!(config.baud_rate, 31_250);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_open_missing_device() {
        let config = SerialConfig {
            device: PathBuf::from("/dev/midibridge-does-not-exist"),
            ..Default::default()
        };
        match open(&config) {
            Err(Error::Serial { context, source }) => {
                assert!(context.starts_with("open "));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            Err(other) => panic!("Expected serial open error, got {other}"),
            Ok(_) => panic!("Expected serial open error"),
        }
    }

    #[test]
    fn test_open_non_tty_fails_configure() {
        let config = SerialConfig {
            device: PathBuf::from("/dev/null"),
            baud_rate: 38400,
            ..Default::default()
        };
        match open(&config) {
            Err(Error::Serial { context, .. }) => assert!(context.starts_with("configure ")),
            Err(other) => panic!("Expected configure error, got {other}"),
            Ok(_) => panic!("Expected configure error"),
        }
    }
}
