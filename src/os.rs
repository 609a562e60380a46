//! The OS page provider: anonymous, private, read/write mappings acquired
//! and released directly via `mmap`/`munmap`.

use std::ptr::NonNull;
use std::sync::OnceLock;

use libc::{c_void, off_t, size_t};

use crate::diag;

static PAGE_SIZE: OnceLock<usize> = OnceLock::new();

/// The OS page size, queried once via `sysconf` and cached thereafter.
pub(crate) fn page_size() -> usize {
  *PAGE_SIZE.get_or_init(|| unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize })
}

/// Maps `n_bytes` of private, anonymous, read/write memory. `n_bytes`
/// should already be page-aligned; the OS rounds up regardless.
pub(crate) fn map(n_bytes: usize) -> Option<NonNull<u8>> {
  const ADDR: *mut c_void = std::ptr::null_mut();
  const PROT: i32 = libc::PROT_READ | libc::PROT_WRITE;
  const FLAGS: i32 = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;
  const FD: i32 = -1;
  const OFFSET: off_t = 0;

  let addr = unsafe { libc::mmap(ADDR, n_bytes as size_t, PROT, FLAGS, FD, OFFSET) };
  if addr == libc::MAP_FAILED {
    let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(-1);
    diag::log_os_error("mmap", errno);
    return None;
  }

  NonNull::new(addr as *mut u8)
}

/// Unmaps `n_bytes` starting at `addr`. A failure is logged and otherwise
/// ignored; the caller's list bookkeeping proceeds regardless.
pub(crate) fn unmap(addr: NonNull<u8>, n_bytes: usize) {
  let rc = unsafe { libc::munmap(addr.as_ptr().cast(), n_bytes as size_t) };
  if rc != 0 {
    let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(-1);
    diag::log_os_error("munmap", errno);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn page_size_is_a_positive_power_of_two() {
    let size = page_size();
    assert!(size > 0);
    assert_eq!(size & (size - 1), 0);
  }

  #[test]
  fn map_then_unmap_round_trips() {
    let size = page_size();
    let addr = map(size).expect("mmap should succeed for one page");
    unsafe {
      // The mapping must be writable.
      std::ptr::write_bytes(addr.as_ptr(), 0xAB, size);
      assert_eq!(*addr.as_ptr(), 0xAB);
    }
    unmap(addr, size);
  }
}
