//! Raw-mode line discipline setup.

use std::io;
use std::os::unix::io::RawFd;

/// Termios speed constant for rates the driver supports natively.
pub(crate) fn standard_speed(baud: u32) -> Option<libc::speed_t> {
    let speed = match baud {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        230400 => libc::B230400,
        _ => return None,
    };
    Some(speed)
}

/// Put the line into raw 8N1 mode with no flow control.
///
/// Reads block until at least one byte is available (`VMIN = 1`).
pub(crate) fn configure_raw(fd: RawFd, speed: libc::speed_t) -> io::Result<()> {
    // SAFETY: termios is plain data; tcgetattr fills it before use.
    let mut tty: libc::termios = unsafe { std::mem::zeroed() };

    // SAFETY: fd is an open descriptor owned by the caller for the whole call.
    if unsafe { libc::tcgetattr(fd, &mut tty) } != 0 {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: tty is an initialized termios owned by this frame.
    unsafe { libc::cfmakeraw(&mut tty) };
    // SAFETY: as above; speed is a termios speed constant.
    if unsafe { libc::cfsetspeed(&mut tty, speed) } != 0 {
        return Err(io::Error::last_os_error());
    }

    tty.c_cflag |= libc::CLOCAL | libc::CREAD;
    tty.c_cflag &= !libc::CRTSCTS;
    tty.c_cc[libc::VMIN] = 1;
    tty.c_cc[libc::VTIME] = 0;

    // SAFETY: fd is still open and tty is a fully initialized termios.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tty) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_speeds() {
        assert_eq!(standard_speed(38400), Some(libc::B38400));
        assert_eq!(standard_speed(115200), Some(libc::B115200));
        assert_eq!(standard_speed(31250), None);
        assert_eq!(standard_speed(0), None);
    }

    #[test]
    fn test_configure_rejects_non_tty() {
        let file = std::fs::File::open("/dev/null").unwrap();
        let fd = std::os::unix::io::AsRawFd::as_raw_fd(&file);
        assert!(configure_raw(fd, libc::B38400).is_err());
    }
}
