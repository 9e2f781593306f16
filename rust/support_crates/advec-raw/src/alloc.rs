//! Thin layer over the global allocator for arrays of `T`.

use std::alloc::Layout;
use std::ptr::NonNull;

use advec_common::{Error, Result};

/// Returns the layout of `capacity` consecutive `T` slots.
///
/// Fails with `CapacityOverflow` when the total size exceeds `isize::MAX`.
#[inline]
pub fn array_layout<T>(capacity: usize) -> Result<Layout> {
    Layout::array::<T>(capacity).map_err(|_| Error::capacity_overflow(capacity))
}

/// Returns `true` if an array of `capacity` slots of `T` needs a real allocation.
#[inline]
pub fn needs_allocation<T>(capacity: usize) -> bool {
    capacity != 0 && size_of::<T>() != 0
}

/// Allocates uninitialized storage for `capacity` slots of `T`.
///
/// Zero capacity and zero-sized `T` never reach the allocator; a dangling,
/// well-aligned pointer is returned instead.
pub fn allocate<T>(capacity: usize) -> Result<NonNull<T>> {
    let layout = array_layout::<T>(capacity)?;
    if !needs_allocation::<T>(capacity) {
        return Ok(NonNull::dangling());
    }
    // SAFETY: `layout` has a non-zero size, checked above.
    let ptr = unsafe { std::alloc::alloc(layout) };
    NonNull::new(ptr.cast::<T>()).ok_or_else(|| Error::alloc_failed(layout))
}

/// Releases storage obtained from [`allocate`].
///
/// # Safety
///
/// `ptr` and `capacity` must be exactly the pointer returned by `allocate::<T>`
/// and the capacity passed to it, and this must be called at most once for
/// them. Values still living in the storage are not dropped.
pub unsafe fn deallocate<T>(ptr: NonNull<T>, capacity: usize) {
    if !needs_allocation::<T>(capacity) {
        return;
    }
    // SAFETY: the layout was valid when the storage was allocated.
    unsafe {
        let layout = Layout::array::<T>(capacity).unwrap_unchecked();
        std::alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout);
    }
}
