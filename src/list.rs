use std::ptr;

use crate::block::BlockHeader;

/// The process-wide free-space structure: a head pointer into the global
/// list plus the monotonic allocation-id counter. Always accessed through
/// the [`crate::Allocator`]'s mutex (holding `&mut ListState` is holding
/// the lock).
pub(crate) struct ListState {
  pub(crate) head: *mut BlockHeader,
  next_alloc_id: u64,
}

// Safety: `ListState` is only ever reached through `Allocator`'s `Mutex`,
// which serializes every access; the raw pointers inside point at
// process-owned mmap'd regions, not thread-local state.
unsafe impl Send for ListState {}

impl ListState {
  pub(crate) const fn new() -> Self {
    Self { head: ptr::null_mut(), next_alloc_id: 0 }
  }

  /// Hands out the next allocation id. Strictly increasing for the life
  /// of the process.
  pub(crate) fn next_id(&mut self) -> u64 {
    let id = self.next_alloc_id;
    self.next_alloc_id += 1;
    id
  }
}
