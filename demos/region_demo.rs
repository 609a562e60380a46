//! Exercises the public `Allocator` API directly: named allocations,
//! growth, shrinkage, and the introspection dump.

use rallocator::Allocator;

static ALLOCATOR: Allocator = Allocator::new();

fn main() {
  unsafe {
    let a = ALLOCATOR.allocate_named(64, "first-buffer");
    let b = ALLOCATOR.allocate_named(32, "second-buffer");
    println!("allocated a={a:p} b={b:p}");

    let mut out = Vec::new();
    ALLOCATOR.dump(&mut out).expect("dump should not fail writing to a Vec");
    print!("{}", String::from_utf8_lossy(&out));

    ALLOCATOR.release(a);

    let grown = ALLOCATOR.reallocate(b, 256);
    println!("grew b into {grown:p}");

    let mut out = Vec::new();
    ALLOCATOR.dump(&mut out).expect("dump should not fail writing to a Vec");
    print!("{}", String::from_utf8_lossy(&out));

    ALLOCATOR.release(grown);

    let mut out = Vec::new();
    ALLOCATOR.dump(&mut out).expect("dump should not fail writing to a Vec");
    println!("final state ({} bytes): {:?}", out.len(), String::from_utf8_lossy(&out));
  }
}
