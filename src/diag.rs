//! Diagnostic logging for OS-call failures.
//!
//! Writes straight to the stderr file descriptor via `libc::write`,
//! bypassing `std::io::Stderr` and the formatting machinery entirely
//! (this can run while the allocator's mutex is held, the same
//! re-entrancy hazard that shapes `dump`'s formatters).

use std::io::Write;

use crate::fmt;

struct RawStderr;

impl Write for RawStderr {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    let n = unsafe { libc::write(libc::STDERR_FILENO, buf.as_ptr().cast(), buf.len()) };
    if n < 0 {
      Err(std::io::Error::last_os_error())
    } else {
      Ok(n as usize)
    }
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

/// Logs `op`'s failure with its OS error number to stderr.
pub(crate) fn log_os_error(op: &str, errno: i32) {
  let mut out = RawStderr;
  let _ = out.write_all(b"rallocator: ");
  let _ = out.write_all(op.as_bytes());
  let _ = out.write_all(b" failed (errno ");
  let _ = fmt::write_udec(&mut out, errno.max(0) as usize);
  let _ = out.write_all(b")\n");
}
