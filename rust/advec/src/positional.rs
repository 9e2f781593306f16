//! Insertion and removal at arbitrary positions.

use std::convert::Infallible;
use std::ptr;

use advec_common::{Error, Result};

use crate::DynArray;

impl<T> DynArray<T> {
    /// Constructs a new element from `f` at `index`, shifting `[index, len)`
    /// one slot to the right, and returns a reference to it.
    ///
    /// `index == len` appends (see [`emplace_back`](Self::emplace_back)).
    /// With spare capacity the value is built before any element moves. A
    /// full array doubles its capacity: the value is constructed at `index`
    /// of the new buffer, then the prefix and the suffix are moved around it.
    /// Either way, if `f` panics the array is left exactly as it was.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn emplace(&mut self, index: usize, f: impl FnOnce() -> T) -> &mut T {
        match self.emplace_with(index, || Ok::<T, Infallible>(f()), |e| e.raise()) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`emplace`](Self::emplace), with a constructor that can fail. An
    /// `Err` from `f`, or a failed storage request converted into `E`, is
    /// returned with the array unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn try_emplace<E: From<Error>>(
        &mut self,
        index: usize,
        f: impl FnOnce() -> std::result::Result<T, E>,
    ) -> std::result::Result<&mut T, E> {
        self.emplace_with(index, f, E::from)
    }

    fn emplace_with<E>(
        &mut self,
        index: usize,
        f: impl FnOnce() -> std::result::Result<T, E>,
        storage_error: impl FnOnce(Error) -> E,
    ) -> std::result::Result<&mut T, E> {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );
        if index == len {
            return self.emplace_back_with(f, storage_error);
        }

        if len < self.capacity() {
            let value = f()?;
            // SAFETY: `[index, len)` is live and slot `len` is spare, so the
            // shifted run stays within capacity. After the shift slot `index`
            // holds a stale bitwise copy that is overwritten without a drop.
            unsafe {
                let hole = self.buf.slot_mut(index);
                ptr::copy(hole, hole.add(1), len - index);
                hole.write(value);
            }
        } else {
            let mut new_buf = self.try_grow_buffer().map_err(storage_error)?;
            let value = f()?;
            // SAFETY: the new buffer has at least `len + 1` slots.
            unsafe { new_buf.slot_mut(index).write(value) };
            self.adopt(new_buf, Some(index));
        }
        self.len += 1;
        // SAFETY: slot `index` was just initialized.
        Ok(unsafe { &mut *self.buf.slot_mut(index) })
    }

    /// Inserts `value` at `index`, shifting later elements to the right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[inline]
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.emplace(index, || value)
    }

    /// Fallible [`insert`](Self::insert): a failed storage request is
    /// returned with the array unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<&mut T> {
        self.emplace_with(index, || Ok(value), |e| e)
    }

    /// Removes and returns the element at `index`, shifting `(index, len)`
    /// one slot to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );
        // SAFETY: slot `index` is live; it is read out before the suffix is
        // shifted over it, and `len` shrinks before the caller sees the value.
        unsafe {
            let hole = self.buf.slot_mut(index);
            let value = hole.read();
            ptr::copy(hole.add(1), hole, len - index - 1);
            self.len = len - 1;
            value
        }
    }

    /// Drops the element at `index` and returns `index`, which now refers to
    /// the element that followed it, or equals [`len`](Self::len) if the
    /// erased element was the last one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }
}
