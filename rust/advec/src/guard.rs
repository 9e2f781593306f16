//! Unwind guards for partially constructed runs of elements.

use std::ptr;

/// Owns the values written so far into a run of fresh slots.
///
/// If construction unwinds before [`finish`](Self::finish), the guard drops
/// exactly the values it was handed, so the storage around it can be released
/// without leaking them.
pub(crate) struct PartialInit<T> {
    start: *mut T,
    initialized: usize,
}

impl<T> PartialInit<T> {
    /// # Safety
    ///
    /// `start` must point to uninitialized slots that stay allocated for as
    /// long as the guard lives, with room for every value pushed.
    pub(crate) unsafe fn new(start: *mut T) -> PartialInit<T> {
        PartialInit {
            start,
            initialized: 0,
        }
    }

    /// # Safety
    ///
    /// The next slot must exist (see [`new`](Self::new)).
    #[inline]
    pub(crate) unsafe fn push(&mut self, value: T) {
        unsafe { self.start.add(self.initialized).write(value) };
        self.initialized += 1;
    }

    /// Hands ownership of the written values back to the caller and returns
    /// their count.
    pub(crate) fn finish(self) -> usize {
        let initialized = self.initialized;
        std::mem::forget(self);
        initialized
    }
}

impl<T> Drop for PartialInit<T> {
    fn drop(&mut self) {
        // SAFETY: exactly `initialized` values were written from `start`.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.start, self.initialized));
        }
    }
}

/// Writes a local length back to the array on every exit path.
///
/// Used while appending into spare capacity: each value is counted as soon as
/// it is written, so the array's `len` is correct even if a later constructor
/// unwinds.
pub(crate) struct SetLenOnDrop<'a> {
    len: &'a mut usize,
    local_len: usize,
}

impl<'a> SetLenOnDrop<'a> {
    #[inline]
    pub(crate) fn new(len: &'a mut usize) -> SetLenOnDrop<'a> {
        SetLenOnDrop {
            local_len: *len,
            len,
        }
    }

    #[inline]
    pub(crate) fn current(&self) -> usize {
        self.local_len
    }

    #[inline]
    pub(crate) fn increment(&mut self) {
        self.local_len += 1;
    }
}

impl Drop for SetLenOnDrop<'_> {
    #[inline]
    fn drop(&mut self) {
        *self.len = self.local_len;
    }
}
