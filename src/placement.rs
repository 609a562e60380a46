//! Placement search: scans the global list front to back for a header
//! whose tail slack (`size - usage`) covers a header-inclusive `need`.
//!
//! The search does not distinguish free from in-use headers; it simply
//! checks slack. A split closes the chosen header's `size` down to its
//! `usage` (see `alloc_engine::place`), so while that block stays in use
//! it reports zero slack. Once it is freed, its `usage` drops to 0 and
//! its slack becomes its whole `size` again, so this search can
//! rediscover it and hand it out whole for a later allocation even when
//! it is not the tail of its region. A region can therefore end up with
//! more than one free block at a time, and a free block is not always
//! the last header in its region; what splitting guarantees is only that
//! it never carves space from before a block's used portion, not that a
//! region ever has a single trailing free block.

use std::ptr;

use crate::block::BlockHeader;
use crate::config::{self, Policy};

/// Returns a header with at least `need` bytes of tail slack under the
/// policy selected by `ALLOCATOR_ALGORITHM`, or null if none exists or
/// the policy is unrecognized (forcing region expansion).
///
/// # Safety
///
/// `head` must be null or point to the first header of a valid list.
pub(crate) unsafe fn find(head: *mut BlockHeader, need: usize) -> *mut BlockHeader {
  let policy = match config::algorithm() {
    Some(p) => p,
    None => return ptr::null_mut(),
  };

  unsafe {
    match policy {
      Policy::FirstFit => find_first_fit(head, need),
      Policy::BestFit => find_best_fit(head, need),
      Policy::WorstFit => find_worst_fit(head, need),
    }
  }
}

unsafe fn find_first_fit(head: *mut BlockHeader, need: usize) -> *mut BlockHeader {
  let mut cur = head;
  while !cur.is_null() {
    unsafe {
      if (*cur).slack() >= need {
        return cur;
      }
      cur = (*cur).next;
    }
  }
  ptr::null_mut()
}

unsafe fn find_best_fit(head: *mut BlockHeader, need: usize) -> *mut BlockHeader {
  let mut cur = head;
  let mut best: *mut BlockHeader = ptr::null_mut();
  let mut best_slack = usize::MAX;

  while !cur.is_null() {
    unsafe {
      let slack = (*cur).slack();
      if slack >= need && slack < best_slack {
        best = cur;
        best_slack = slack;
      }
      cur = (*cur).next;
    }
  }

  best
}

unsafe fn find_worst_fit(head: *mut BlockHeader, need: usize) -> *mut BlockHeader {
  let mut cur = head;
  let mut worst: *mut BlockHeader = ptr::null_mut();
  let mut worst_slack = 0usize;
  let mut found = false;

  while !cur.is_null() {
    unsafe {
      let slack = (*cur).slack();
      if slack >= need && (!found || slack > worst_slack) {
        worst = cur;
        worst_slack = slack;
        found = true;
      }
      cur = (*cur).next;
    }
  }

  worst
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::block::NAME_CAPACITY;
  use std::sync::Mutex;

  static ENV_LOCK: Mutex<()> = Mutex::new(());

  fn boxed(size: usize, usage: usize) -> *mut BlockHeader {
    Box::into_raw(Box::new(BlockHeader {
      alloc_id: 0,
      size,
      usage,
      region_start: ptr::null_mut(),
      region_size: 0,
      next: ptr::null_mut(),
      name: [0u8; NAME_CAPACITY],
    }))
  }

  unsafe fn free_chain(mut head: *mut BlockHeader) {
    unsafe {
      while !head.is_null() {
        let next = (*head).next;
        drop(Box::from_raw(head));
        head = next;
      }
    }
  }

  /// Three single-block "regions" with tail slack 64, 32, 96 and a
  /// request of 16: first-fit takes region 1, best-fit region 2 (minimal
  /// sufficient slack), worst-fit region 3 (maximal slack).
  #[test]
  fn policy_selects_expected_region() {
    unsafe {
      let h1 = boxed(64, 0);
      let h2 = boxed(32, 0);
      let h3 = boxed(96, 0);
      (*h1).next = h2;
      (*h2).next = h3;

      assert_eq!(find_first_fit(h1, 16), h1);
      assert_eq!(find_best_fit(h1, 16), h2);
      assert_eq!(find_worst_fit(h1, 16), h3);

      free_chain(h1);
    }
  }

  #[test]
  fn ties_are_broken_by_earliest_in_list_order() {
    unsafe {
      let h1 = boxed(50, 0);
      let h2 = boxed(50, 0);
      (*h1).next = h2;

      assert_eq!(find_best_fit(h1, 16), h1);
      assert_eq!(find_worst_fit(h1, 16), h1);

      free_chain(h1);
    }
  }

  #[test]
  fn no_candidate_returns_null() {
    unsafe {
      let h1 = boxed(8, 0);
      assert!(find_first_fit(h1, 100).is_null());
      free_chain(h1);
    }
  }

  #[test]
  fn unrecognized_policy_env_forces_expansion() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe { std::env::set_var("ALLOCATOR_ALGORITHM", "nonsense") };

    unsafe {
      let h1 = boxed(1024, 0);
      assert!(find(h1, 16).is_null());
      free_chain(h1);
    }

    unsafe { std::env::remove_var("ALLOCATOR_ALGORITHM") };
  }
}
