//! The allocation engine: rounds and aligns a request, consults placement,
//! splits a chosen block or acquires a fresh region, and returns the
//! header backing the allocation. Naming and scribbling are layered on
//! top by [`crate::Allocator`]; this module only manages the list.

use std::ptr;

use crate::align;
use crate::block::{BlockHeader, HEADER_SIZE, NAME_CAPACITY};
use crate::list::ListState;
use crate::os;
use crate::placement;

/// Header-inclusive byte count for a `payload_size`-byte request.
fn need_for(payload_size: usize) -> usize {
  align::align8(payload_size) + HEADER_SIZE
}

/// Maps a fresh region sized to cover `need`, installs its sole header
/// (fully free, spanning the whole region) at the tail of the global
/// list, and returns it. Null on OS mapping failure.
unsafe fn acquire_region(state: &mut ListState, need: usize) -> *mut BlockHeader {
  let region_size = align::page_align(need, os::page_size());

  let addr = match os::map(region_size) {
    Some(a) => a,
    None => return ptr::null_mut(),
  };

  let header = addr.as_ptr() as *mut BlockHeader;
  unsafe {
    (*header).alloc_id = state.next_id();
    (*header).size = region_size;
    (*header).usage = 0;
    (*header).region_start = header;
    (*header).region_size = region_size;
    (*header).next = ptr::null_mut();
    (*header).name = [0u8; NAME_CAPACITY];
  }

  if state.head.is_null() {
    state.head = header;
  } else {
    unsafe {
      let mut tail = state.head;
      while !(*tail).next.is_null() {
        tail = (*tail).next;
      }
      (*tail).next = header;
    }
  }

  header
}

/// Carves `need` bytes out of `chosen`'s tail slack. If `chosen` is
/// currently free, the entire header becomes the allocation with no
/// split (this is how a freed non-tail block, or a region's free tail,
/// gets handed out whole). Otherwise a new header is created at
/// `chosen`'s tail and `chosen` is closed (`size` shrunk to its own
/// `usage`), so it reports no slack until it is later freed.
unsafe fn place(state: &mut ListState, chosen: *mut BlockHeader, need: usize) -> *mut BlockHeader {
  unsafe {
    debug_assert!((*chosen).slack() >= need, "placement post-condition violated");

    if (*chosen).usage == 0 {
      (*chosen).usage = need;
      return chosen;
    }

    let new_header = (chosen as *mut u8).add((*chosen).usage) as *mut BlockHeader;
    (*new_header).alloc_id = state.next_id();
    (*new_header).size = (*chosen).size - (*chosen).usage;
    (*new_header).usage = need;
    (*new_header).region_start = (*chosen).region_start;
    (*new_header).region_size = (*chosen).region_size;
    (*new_header).next = (*chosen).next;
    (*new_header).name = [0u8; NAME_CAPACITY];

    (*chosen).size = (*chosen).usage;
    (*chosen).next = new_header;

    new_header
  }
}

/// Finds or creates space for `payload_size` bytes and returns the
/// backing header. Null only on OS mapping failure.
pub(crate) unsafe fn allocate_block(state: &mut ListState, payload_size: usize) -> *mut BlockHeader {
  let need = need_for(payload_size);

  let found = unsafe { placement::find(state.head, need) };
  let chosen = if found.is_null() {
    let fresh = unsafe { acquire_region(state, need) };
    if fresh.is_null() {
      return ptr::null_mut();
    }
    fresh
  } else {
    found
  };

  unsafe { place(state, chosen, need) }
}
