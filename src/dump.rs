//! The introspection writer: a textual dump of the global list in list
//! order, built entirely on [`crate::fmt`]'s hand-rolled formatters so it
//! never risks calling back into this crate's own allocation entries.

use std::io::{self, Write};

use crate::block::{BlockHeader, HEADER_SIZE};
use crate::fmt;

/// Writes the dump to `out`: a `[REGION] <start>-<end> <size>` line
/// precedes each header that opens a region, and every header writes a
/// `[BLOCK]  <start>-<end> (<alloc_id>) '<name>' <size> <usage>
/// <user_size>` line, where `<user_size>` is `0` for a free header and
/// `usage - sizeof(header)` otherwise.
pub(crate) fn write_dump<W: Write>(head: *mut BlockHeader, out: &mut W) -> io::Result<()> {
  let mut cur = head;
  while !cur.is_null() {
    unsafe {
      if (*cur).is_region_head() {
        write_region_line(cur, out)?;
      }
      write_block_line(cur, out)?;
      cur = (*cur).next;
    }
  }
  Ok(())
}

unsafe fn write_region_line<W: Write>(header: *mut BlockHeader, out: &mut W) -> io::Result<()> {
  unsafe {
    let start = header as usize;
    let end = start + (*header).region_size;

    out.write_all(b"[REGION] ")?;
    fmt::write_ptr(out, start)?;
    out.write_all(b"-")?;
    fmt::write_ptr(out, end)?;
    out.write_all(b" ")?;
    fmt::write_udec(out, (*header).region_size)?;
    out.write_all(b"\n")
  }
}

unsafe fn write_block_line<W: Write>(header: *mut BlockHeader, out: &mut W) -> io::Result<()> {
  unsafe {
    let start = header as usize;
    let end = start + (*header).size;
    let user_size = if (*header).usage == 0 { 0 } else { (*header).usage - HEADER_SIZE };

    out.write_all(b"[BLOCK]  ")?;
    fmt::write_ptr(out, start)?;
    out.write_all(b"-")?;
    fmt::write_ptr(out, end)?;
    out.write_all(b" (")?;
    fmt::write_udec(out, (*header).alloc_id as usize)?;
    out.write_all(b") '")?;
    out.write_all((*header).name_bytes())?;
    out.write_all(b"' ")?;
    fmt::write_udec(out, (*header).size)?;
    out.write_all(b" ")?;
    fmt::write_udec(out, (*header).usage)?;
    out.write_all(b" ")?;
    fmt::write_udec(out, user_size)?;
    out.write_all(b"\n")
  }
}
