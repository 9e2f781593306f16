//! Owned, uninitialized storage for a fixed number of `T` slots.

use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

use advec_common::{Result, result::unwrap_storage};

use crate::alloc;

/// A block of memory sized for exactly `capacity` values of `T`, none of
/// which are considered constructed.
///
/// `RawBuffer` only acquires and releases storage. Dropping it returns the
/// memory to the global allocator without running any destructor: whoever
/// placed values into the slots must drop them (or move them out) first.
///
/// A buffer with zero capacity is the empty sentinel: its pointer is dangling
/// and no allocation exists. Zero-sized `T` never allocate either; their
/// capacity is tracked logically.
///
/// Buffers are not `Clone`. Ownership moves with the value, or explicitly
/// through [`take`](Self::take) and [`swap`](Self::swap).
pub struct RawBuffer<T> {
    /// Start of the storage; dangling for the empty sentinel.
    ptr: NonNull<T>,
    /// Number of `T` slots the storage is sized for.
    capacity: usize,
    _marker: PhantomData<T>,
}

// The buffer uniquely owns its storage, so it is as thread-safe as `T`.
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// Creates the empty sentinel buffer. Never allocates.
    pub const fn new() -> RawBuffer<T> {
        RawBuffer {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Acquires storage for exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics with `capacity overflow` if the size in bytes exceeds
    /// `isize::MAX`; allocator failure aborts through
    /// [`std::alloc::handle_alloc_error`].
    pub fn with_capacity(capacity: usize) -> RawBuffer<T> {
        unwrap_storage(Self::try_with_capacity(capacity))
    }

    /// Acquires storage for exactly `capacity` slots, reporting failure
    /// instead of diverging. On error nothing has been allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<RawBuffer<T>> {
        let ptr = alloc::allocate::<T>(capacity)?;
        Ok(RawBuffer {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Returns the number of slots this buffer is sized for.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` for the empty sentinel (zero capacity).
    #[inline]
    pub fn is_unallocated(&self) -> bool {
        self.capacity == 0
    }

    /// Returns a raw pointer to the first slot.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns a mutable raw pointer to the first slot.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns a pointer to slot `offset`. `offset == capacity` yields the
    /// one-past-the-end pointer.
    #[inline]
    pub fn slot(&self, offset: usize) -> *const T {
        debug_assert!(offset <= self.capacity);
        // SAFETY: offset is within the allocation or one past its end.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Mutable counterpart of [`slot`](Self::slot).
    #[inline]
    pub fn slot_mut(&mut self, offset: usize) -> *mut T {
        debug_assert!(offset <= self.capacity);
        // SAFETY: offset is within the allocation or one past its end.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Views the whole storage as a slice of possibly-uninitialized slots.
    #[inline]
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<T>] {
        // SAFETY: `MaybeUninit<T>` has the layout of `T` and needs no
        // initialization; the storage holds `capacity` slots.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Mutable counterpart of [`as_uninit_slice`](Self::as_uninit_slice).
    #[inline]
    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: see `as_uninit_slice`; `&mut self` guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Exchanges storage with `other` in constant time.
    #[inline]
    pub fn swap(&mut self, other: &mut RawBuffer<T>) {
        std::mem::swap(self, other);
    }

    /// Transfers the storage out, leaving `self` as the empty sentinel.
    #[inline]
    pub fn take(&mut self) -> RawBuffer<T> {
        std::mem::replace(self, RawBuffer::new())
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        // SAFETY: `ptr` and `capacity` came from `alloc::allocate`, or are
        // the sentinel pair that `deallocate` ignores.
        unsafe { alloc::deallocate(self.ptr, self.capacity) }
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        RawBuffer::new()
    }
}

impl<T> fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
