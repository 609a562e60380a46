//! The concurrency wrapper: a single process-wide mutex guarding every
//! public entry, tying the placement, allocation, deallocation,
//! reallocation, and introspection engines to one shared global list.

use std::alloc::{GlobalAlloc, Layout};
use std::ptr;
use std::sync::Mutex;

use crate::alloc_engine;
use crate::block::header_from_payload;
use crate::config;
use crate::dealloc_engine;
use crate::dump;
use crate::list::ListState;
use crate::realloc_engine;

/// A drop-in replacement for the process heap allocator, backed by
/// anonymous OS page mappings it manages itself.
///
/// Every method acquires the internal mutex on entry and releases it (via
/// `MutexGuard` drop) on every exit path, including early returns and
/// panics, with no hand-rolled unlock needed at each site.
pub struct Allocator {
  state: Mutex<ListState>,
}

impl Allocator {
  /// Creates an allocator with no regions mapped yet. Regions are
  /// acquired lazily on first use.
  pub const fn new() -> Self {
    Self { state: Mutex::new(ListState::new()) }
  }

  /// Allocates `size` bytes, 8-byte aligned. Returns null on OS mapping
  /// failure. `size == 0` is legal and returns a valid, distinct pointer.
  ///
  /// # Safety
  ///
  /// Matches the platform `malloc` contract: the returned pointer must
  /// eventually be passed to exactly one of [`Allocator::release`] or
  /// [`Allocator::reallocate`], and not accessed beyond `size` bytes.
  pub unsafe fn allocate(&self, size: usize) -> *mut u8 {
    let mut state = self.lock();
    unsafe { self.allocate_locked(&mut state, size, None) }
  }

  /// Same as [`Allocator::allocate`], additionally recording `name`
  /// (truncated to the header's fixed capacity) for introspection via
  /// [`Allocator::dump`].
  ///
  /// # Safety
  ///
  /// See [`Allocator::allocate`].
  pub unsafe fn allocate_named(&self, size: usize, name: &str) -> *mut u8 {
    let mut state = self.lock();
    unsafe { self.allocate_locked(&mut state, size, Some(name)) }
  }

  /// Allocates `nmemb * size` bytes and zero-fills them, overriding any
  /// scribble request (zeroing always happens last).
  ///
  /// # Safety
  ///
  /// See [`Allocator::allocate`].
  pub unsafe fn allocate_zeroed(&self, nmemb: usize, size: usize) -> *mut u8 {
    let total = nmemb.saturating_mul(size);
    let mut state = self.lock();
    let payload = unsafe { self.allocate_locked(&mut state, total, None) };
    if !payload.is_null() {
      unsafe { ptr::write_bytes(payload, 0, total) };
    }
    payload
  }

  /// Resizes the allocation at `ptr` to `size` bytes. `ptr == null` is
  /// equivalent to [`Allocator::allocate`]; `size == 0` frees `ptr` and
  /// returns null.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a payload pointer previously returned by this
  /// allocator and not already freed.
  pub unsafe fn reallocate(&self, ptr_in: *mut u8, size: usize) -> *mut u8 {
    let mut state = self.lock();
    unsafe { realloc_engine::reallocate_block(&mut state, ptr_in, size) }
  }

  /// Frees a pointer previously returned by this allocator. `ptr == null`
  /// is a no-op.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a payload pointer previously returned by this
  /// allocator and not already freed. Double-free and foreign pointers are
  /// undefined behavior, unchecked, matching the platform `free` contract.
  pub unsafe fn release(&self, ptr_in: *mut u8) {
    if ptr_in.is_null() {
      return;
    }
    let mut state = self.lock();
    unsafe {
      let header = header_from_payload(ptr_in);
      dealloc_engine::deallocate_block(&mut state, header);
    }
  }

  /// Writes a textual dump of the entire global list to `out`, in list
  /// order. Each region-opening header is preceded by a
  /// `[REGION] <start>-<end> <size>` line, and every header produces a
  /// `[BLOCK]  <start>-<end> (<alloc_id>) '<name>' <size> <usage>
  /// <user_size>` line.
  pub fn dump<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
    let state = self.lock();
    dump::write_dump(state.head, out)
  }

  unsafe fn allocate_locked(
    &self,
    state: &mut ListState,
    size: usize,
    name: Option<&str>,
  ) -> *mut u8 {
    unsafe {
      let header = alloc_engine::allocate_block(state, size);
      if header.is_null() {
        return ptr::null_mut();
      }

      if let Some(name) = name {
        (*header).set_name(name);
      }

      let payload = (*header).payload_ptr();
      if config::scribble_enabled() {
        ptr::write_bytes(payload, 0xAA, size);
      }
      payload
    }
  }

  /// Acquires the internal mutex, recovering from poisoning rather than
  /// propagating a panic: a panic mid-mutation elsewhere in the process
  /// must not prevent every other thread's allocations from proceeding.
  fn lock(&self) -> std::sync::MutexGuard<'_, ListState> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl Default for Allocator {
  fn default() -> Self {
    Self::new()
  }
}

unsafe impl GlobalAlloc for Allocator {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    unsafe { self.allocate(layout.size()) }
  }

  unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
    unsafe { self.allocate_zeroed(1, layout.size()) }
  }

  unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
    unsafe { self.release(ptr) };
  }

  unsafe fn realloc(&self, ptr: *mut u8, _layout: Layout, new_size: usize) -> *mut u8 {
    unsafe { self.reallocate(ptr, new_size) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_alloc_then_free_leaves_no_regions_mapped() {
    let allocator = Allocator::new();
    unsafe {
      let p = allocator.allocate(5);
      assert!(!p.is_null());

      let mut out = Vec::new();
      allocator.dump(&mut out).unwrap();
      assert!(!out.is_empty(), "one region should be mapped while p is live");

      allocator.release(p);

      let mut out = Vec::new();
      allocator.dump(&mut out).unwrap();
      assert!(out.is_empty(), "zero regions should remain after release");
    }
  }

  #[test]
  fn full_drain_unmaps_the_region() {
    let allocator = Allocator::new();
    unsafe {
      let p1 = allocator.allocate(16);
      let p2 = allocator.allocate(16);
      allocator.release(p1);
      allocator.release(p2);

      let mut out = Vec::new();
      allocator.dump(&mut out).unwrap();
      assert!(out.is_empty());
    }
  }

  #[test]
  fn release_null_is_a_no_op() {
    let allocator = Allocator::new();
    unsafe {
      allocator.release(ptr::null_mut());
    }
  }

  #[test]
  fn named_allocation_appears_in_the_dump() {
    let allocator = Allocator::new();
    unsafe {
      let p = allocator.allocate_named(16, "session-table");
      let mut out = Vec::new();
      allocator.dump(&mut out).unwrap();
      let text = String::from_utf8(out).unwrap();
      assert!(text.contains("'session-table'"));
      allocator.release(p);
    }
  }

  #[test]
  fn zeroed_allocation_is_all_zero() {
    let allocator = Allocator::new();
    unsafe {
      let p = allocator.allocate_zeroed(8, 4);
      assert!(!p.is_null());
      for i in 0..32 {
        assert_eq!(*p.add(i), 0);
      }
      allocator.release(p);
    }
  }

  #[test]
  fn realloc_in_place_preserves_prefix_when_size_allows() {
    let allocator = Allocator::new();
    unsafe {
      let p = allocator.allocate(8);
      *(p as *mut u64) = 0xDEAD_BEEF_CAFE_F00D;

      let q = allocator.reallocate(p, 16);
      assert_eq!(*(q as *mut u64), 0xDEAD_BEEF_CAFE_F00D);

      allocator.release(q);
    }
  }

  #[test]
  fn global_alloc_adapter_round_trips() {
    let allocator = Allocator::new();
    let layout = Layout::new::<u64>();
    unsafe {
      let p = GlobalAlloc::alloc(&allocator, layout) as *mut u64;
      assert!(!p.is_null());
      *p = 42;
      assert_eq!(*p, 42);
      GlobalAlloc::dealloc(&allocator, p as *mut u8, layout);
    }
  }
}
