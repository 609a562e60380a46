//! # rallocator - A process heap allocator
//!
//! This crate provides a drop-in [`GlobalAlloc`](std::alloc::GlobalAlloc)
//! implementation that manages memory directly via anonymous `mmap`
//! regions, rather than delegating to the platform's own allocator.
//!
//! ## Overview
//!
//! Every allocation lives inside a *region* (one or more OS pages mapped
//! in a single `mmap` call). A region starts as one large free block; each
//! allocation splits bytes off its tail, or hands out a freed block whole
//! if one already covers the request, and a region is returned to the OS
//! the moment every block inside it is free. This trades fragmentation
//! resistance for a very small, very auditable implementation:
//!
//! ```text
//!   One region after three allocations, the second since freed:
//!
//!   ┌──────────┬────────────┬──────────┬────────────┬─────────────────┐
//!   │ header 1 │  payload 1 │ header 2 │  (freed)   │  free tail...   │
//!   └──────────┴────────────┴──────────┴────────────┴─────────────────┘
//!    alloc_id 1              alloc_id 2                region head
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rallocator
//!   ├── align           - Alignment macros (align!, align_to!)
//!   ├── block           - BlockHeader: the in-memory record at offset 0
//!   ├── list            - ListState: the mutex-guarded global list
//!   ├── config          - ALLOCATOR_ALGORITHM / ALLOCATOR_SCRIBBLE env config
//!   ├── placement       - first/best/worst-fit candidate search
//!   ├── os              - mmap/munmap/page size wrappers
//!   ├── alloc_engine    - region acquisition + block splitting
//!   ├── dealloc_engine  - block freeing + region drain/unmap
//!   ├── realloc_engine  - grow/shrink in place, or allocate-copy-free
//!   ├── dump            - textual introspection of the global list
//!   ├── fmt             - re-entrancy-safe integer/pointer formatting
//!   ├── diag            - re-entrancy-safe stderr diagnostics
//!   └── allocator       - Allocator: the public, thread-safe facade
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rallocator::Allocator;
//!
//! #[global_allocator]
//! static ALLOCATOR: Allocator = Allocator::new();
//!
//! fn main() {
//!     let v: Vec<u64> = (0..16).collect();
//!     println!("{:?}", v);
//! }
//! ```
//!
//! The lower-level API is also available directly:
//!
//! ```rust
//! use rallocator::Allocator;
//!
//! let allocator = Allocator::new();
//! unsafe {
//!     let ptr = allocator.allocate_named(64, "demo-buffer");
//!     assert!(!ptr.is_null());
//!     allocator.release(ptr);
//! }
//! ```
//!
//! ## Placement policy
//!
//! The `ALLOCATOR_ALGORITHM` environment variable selects how a request is
//! matched against free tail slack: `first-fit` (the default), `best-fit`,
//! or `worst-fit`. It is read fresh on every allocation, so a process may
//! change policy between calls. An unrecognized value disables reuse
//! entirely, forcing every allocation to map a fresh region.
//!
//! Setting `ALLOCATOR_SCRIBBLE=1` fills every newly returned payload with
//! the byte `0xAA` before handing it back, which helps surface
//! uninitialized-read bugs in callers.
//!
//! ## Limitations
//!
//! - **No coalescing**: adjacent freed blocks are never merged; a region
//!   is only reclaimed once every block inside it is free.
//! - **Unix-only**: built directly on `libc`'s `mmap`/`munmap`/`sysconf`.
//!
//! ## Safety
//!
//! This crate is inherently unsafe as it deals with raw memory management.
//! All allocation and deallocation operations require `unsafe` blocks.

pub mod align;
mod alloc_engine;
mod allocator;
mod block;
mod config;
mod dealloc_engine;
mod diag;
mod dump;
mod fmt;
mod list;
mod os;
mod placement;
mod realloc_engine;

pub use allocator::Allocator;
