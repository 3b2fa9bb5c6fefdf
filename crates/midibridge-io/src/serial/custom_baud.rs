//! Non-standard baud rates through the legacy `serial_struct` divisor.
//!
//! MIDI's 31250 baud is not a termios rate. UART drivers that support
//! `ASYNC_SPD_CUST` run at `baud_base / custom_divisor` whenever the line
//! is set to B38400.

use std::io;
use std::os::raw::{c_char, c_int, c_uchar, c_uint, c_ulong, c_ushort};
use std::os::unix::io::RawFd;
use tracing::debug;

const ASYNC_SPD_CUST: c_int = 0x0030;
const ASYNC_SPD_MASK: c_int = 0x1030;

/// Mirror of `struct serial_struct` from `<linux/serial.h>`.
#[repr(C)]
#[allow(dead_code)]
struct SerialStruct {
    kind: c_int,
    line: c_int,
    port: c_uint,
    irq: c_int,
    flags: c_int,
    xmit_fifo_size: c_int,
    custom_divisor: c_int,
    baud_base: c_int,
    close_delay: c_ushort,
    io_type: c_char,
    reserved_char: [c_char; 1],
    hub6: c_int,
    closing_wait: c_ushort,
    closing_wait2: c_ushort,
    iomem_base: *mut c_uchar,
    iomem_reg_shift: c_ushort,
    port_high: c_uint,
    iomap_base: c_ulong,
}

/// Divisor for `baud` given the UART clock, or `None` if it rounds to zero.
pub(crate) fn divisor(baud_base: u32, baud: u32) -> Option<u32> {
    if baud == 0 {
        return None;
    }
    match baud_base / baud {
        0 => None,
        d => Some(d),
    }
}

/// Returns the rate actually achieved, which can differ from `baud` when the
/// UART clock is not an exact multiple.
pub(crate) fn apply(fd: RawFd, baud: u32) -> io::Result<u32> {
    // SAFETY: SerialStruct is plain data; the ioctl fills it.
    let mut ser: SerialStruct = unsafe { std::mem::zeroed() };

    // SAFETY: fd is open and ser is a correctly sized serial_struct.
    if unsafe { libc::ioctl(fd, libc::TIOCGSERIAL, &mut ser as *mut SerialStruct) } < 0 {
        return Err(io::Error::last_os_error());
    }

    let divisor = divisor(ser.baud_base.max(0) as u32, baud).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("baud {} unreachable from base {}", baud, ser.baud_base),
        )
    })?;

    ser.custom_divisor = divisor as c_int;
    ser.flags &= !ASYNC_SPD_MASK;
    ser.flags |= ASYNC_SPD_CUST;

    // SAFETY: same fd, and ser was filled by TIOCGSERIAL above.
    if unsafe { libc::ioctl(fd, libc::TIOCSSERIAL, &ser as *const SerialStruct) } < 0 {
        return Err(io::Error::last_os_error());
    }

    let actual = ser.baud_base as u32 / divisor;
    debug!(
        baud_base = ser.baud_base,
        divisor, actual, "Custom baud rate applied"
    );
    Ok(actual)
}
