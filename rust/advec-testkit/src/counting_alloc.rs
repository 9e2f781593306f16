//! Global allocator wrapper with per-thread allocation accounting.
//!
//! Install it in a test binary with
//!
//! ```ignore
//! #[global_allocator]
//! static ALLOC: CountingAllocator = CountingAllocator;
//! ```
//!
//! and measure an operation with [`measure`]. Counters are thread-local, so
//! tests running in parallel do not see each other's allocations.
//! [`fail_next_allocation`] makes the next allocation on the current thread
//! return null, which is how allocator exhaustion is simulated.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
    static STATS: Cell<AllocStats> = const { Cell::new(AllocStats::ZERO) };
    static FAIL_NEXT: Cell<bool> = const { Cell::new(false) };
}

/// Allocation counters of the current thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocStats {
    pub allocations: usize,
    pub deallocations: usize,
    pub reallocations: usize,
    /// Bytes allocated minus bytes released.
    pub live_bytes: isize,
}

impl AllocStats {
    const ZERO: AllocStats = AllocStats {
        allocations: 0,
        deallocations: 0,
        reallocations: 0,
        live_bytes: 0,
    };

    /// Counter deltas from `earlier` to `self`.
    pub fn since(&self, earlier: &AllocStats) -> AllocStats {
        AllocStats {
            allocations: self.allocations - earlier.allocations,
            deallocations: self.deallocations - earlier.deallocations,
            reallocations: self.reallocations - earlier.reallocations,
            live_bytes: self.live_bytes - earlier.live_bytes,
        }
    }
}

/// Forwards to [`System`] and records every call in thread-local counters.
pub struct CountingAllocator;

fn update(f: impl FnOnce(&mut AllocStats)) {
    // Thread-locals may already be gone while a thread is shutting down.
    let _ = STATS.try_with(|cell| {
        let mut stats = cell.get();
        f(&mut stats);
        cell.set(stats);
    });
}

/// Consumes an armed failure, if any.
fn take_failure() -> bool {
    FAIL_NEXT.try_with(|f| f.replace(false)).unwrap_or(false)
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if take_failure() {
            return std::ptr::null_mut();
        }
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            update(|s| {
                s.allocations += 1;
                s.live_bytes += layout.size() as isize;
            });
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        if take_failure() {
            return std::ptr::null_mut();
        }
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            update(|s| {
                s.allocations += 1;
                s.live_bytes += layout.size() as isize;
            });
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        update(|s| {
            s.deallocations += 1;
            s.live_bytes -= layout.size() as isize;
        });
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            update(|s| {
                s.reallocations += 1;
                s.live_bytes += new_size as isize - layout.size() as isize;
            });
        }
        new_ptr
    }
}

/// Makes the next allocation (or zeroed allocation) on this thread fail.
pub fn fail_next_allocation() {
    FAIL_NEXT.with(|f| f.set(true));
}

/// Cancels a failure armed by [`fail_next_allocation`] that has not fired.
pub fn disarm() {
    FAIL_NEXT.with(|f| f.set(false));
}

/// Current counters of this thread.
pub fn stats() -> AllocStats {
    STATS.with(Cell::get)
}

/// Runs `f` and returns its result with the allocation deltas it caused on
/// this thread.
pub fn measure<R>(f: impl FnOnce() -> R) -> (R, AllocStats) {
    let before = stats();
    let result = f();
    (result, stats().since(&before))
}
