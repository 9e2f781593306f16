//! Reallocation, tail insertion and tail removal.

use std::convert::Infallible;
use std::ptr;

use advec_common::{Error, Result, result::unwrap_storage};
use advec_raw::RawBuffer;

use crate::DynArray;

impl<T> DynArray<T> {
    /// Grows the capacity to exactly `new_capacity` if it is currently
    /// smaller. Unlike `Vec::reserve`, the argument is the total capacity,
    /// not the additional room.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow; allocator failure aborts through
    /// [`std::alloc::handle_alloc_error`].
    pub fn reserve(&mut self, new_capacity: usize) {
        unwrap_storage(self.try_reserve(new_capacity))
    }

    /// Fallible [`reserve`](Self::reserve). On error the array is unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let new_buf = RawBuffer::<T>::try_with_capacity(new_capacity)?;
        self.adopt(new_buf, None);
        Ok(())
    }

    /// Resizes the array in place to `new_len`, calling `f` for each new
    /// element.
    ///
    /// Shrinking drops the tail. Growing first reserves exactly `new_len`
    /// slots. If `f` panics, the elements already appended stay in the array.
    pub fn resize_with(&mut self, new_len: usize, mut f: impl FnMut() -> T) {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len);
        self.fill_spare_with(new_len - self.len, |_| f());
    }

    /// Appends `value` to the end of the array.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.emplace_back(|| value);
    }

    /// Appends `value`, reporting a failed storage request instead of
    /// diverging. On error the array is unchanged and `value` is dropped.
    pub fn try_push(&mut self, value: T) -> Result<&mut T> {
        self.emplace_back_with(|| Ok(value), |e| e)
    }

    /// Constructs a new element at the end of the array from `f` and returns
    /// a reference to it.
    ///
    /// With spare capacity the value is written straight into the next slot.
    /// Otherwise the capacity doubles (an empty array grows to one slot): the
    /// new buffer is acquired, the value is constructed in it, and only then
    /// are the existing elements moved over. If `f` panics, the array keeps
    /// its length, capacity, storage and contents.
    pub fn emplace_back(&mut self, f: impl FnOnce() -> T) -> &mut T {
        match self.emplace_back_with(|| Ok::<T, Infallible>(f()), |e| e.raise()) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`emplace_back`](Self::emplace_back), with a constructor that
    /// can fail. An `Err` from `f`, or a failed storage request converted
    /// into `E`, is returned with the array unchanged. Storage is acquired
    /// before `f` runs, so `f` is not called when growth fails.
    pub fn try_emplace_back<E: From<Error>>(
        &mut self,
        f: impl FnOnce() -> std::result::Result<T, E>,
    ) -> std::result::Result<&mut T, E> {
        self.emplace_back_with(f, E::from)
    }

    pub(crate) fn emplace_back_with<E>(
        &mut self,
        f: impl FnOnce() -> std::result::Result<T, E>,
        storage_error: impl FnOnce(Error) -> E,
    ) -> std::result::Result<&mut T, E> {
        let index = self.len;
        if index < self.capacity() {
            let value = f()?;
            // SAFETY: slot `len` is spare.
            unsafe { self.buf.slot_mut(index).write(value) };
        } else {
            let mut new_buf = self.try_grow_buffer().map_err(storage_error)?;
            let value = f()?;
            // SAFETY: the new buffer has at least `len + 1` slots.
            unsafe { new_buf.slot_mut(index).write(value) };
            self.adopt(new_buf, None);
        }
        self.len += 1;
        // SAFETY: slot `index` was just initialized.
        Ok(unsafe { &mut *self.buf.slot_mut(index) })
    }

    /// Drops the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn pop_back(&mut self) {
        assert!(self.len > 0, "pop_back on an empty array");
        self.len -= 1;
        // SAFETY: the slot was live and is no longer counted.
        unsafe { ptr::drop_in_place(self.buf.slot_mut(self.len)) }
    }

    /// Removes the last element and returns it, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is no longer counted.
        Some(unsafe { self.buf.slot(self.len).read() })
    }

    /// Drops every element past `new_len`. No effect if `new_len >= len`.
    /// Capacity is kept.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(self.buf.slot_mut(new_len), self.len - new_len);
        self.len = new_len;
        // SAFETY: the tail was live and is no longer counted, so a panicking
        // destructor cannot cause a double drop.
        unsafe { ptr::drop_in_place(tail) }
    }

    /// Drops all elements, keeping the capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Capacity to grow to when appending into a full array.
    pub(crate) fn grown_capacity(&self) -> usize {
        unwrap_storage(self.try_grown_capacity())
    }

    fn try_grown_capacity(&self) -> Result<usize> {
        self.capacity()
            .checked_mul(Self::GROWTH_FACTOR)
            .map(|capacity| capacity.max(Self::MIN_GROWTH_CAPACITY))
            .ok_or_else(|| Error::capacity_overflow(self.capacity()))
    }

    /// Acquires an empty buffer sized by the doubling rule.
    pub(crate) fn try_grow_buffer(&self) -> Result<RawBuffer<T>> {
        RawBuffer::<T>::try_with_capacity(self.try_grown_capacity()?)
    }

    /// Moves the live elements into `new_buf` and makes it the array's
    /// storage. The old storage is released without dropping anything.
    ///
    /// With `gap = Some(i)`, elements `[i, len)` land one slot further right,
    /// leaving slot `i` of the new buffer to the caller. `len` is not changed.
    pub(crate) fn adopt(&mut self, mut new_buf: RawBuffer<T>, gap: Option<usize>) {
        let len = self.len;
        debug_assert!(new_buf.capacity() >= len + usize::from(gap.is_some()));

        let src = self.buf.as_ptr();
        let dst = new_buf.as_mut_ptr();
        // SAFETY: source and destination are distinct allocations, `[0, len)`
        // is live in the source and the destination has room for it (plus the
        // gap). Moves are bitwise; the source slots become logically
        // uninitialized.
        unsafe {
            match gap {
                None => ptr::copy_nonoverlapping(src, dst, len),
                Some(split) => {
                    debug_assert!(split <= len);
                    ptr::copy_nonoverlapping(src, dst, split);
                    ptr::copy_nonoverlapping(src.add(split), dst.add(split + 1), len - split);
                }
            }
        }
        self.buf.swap(&mut new_buf);

        log::trace!(
            "DynArray<{}> reallocated: capacity {} -> {}, {} elements relocated",
            std::any::type_name::<T>(),
            new_buf.capacity(),
            self.buf.capacity(),
            len
        );
    }
}

impl<T: Default> DynArray<T> {
    /// Resizes the array to `new_len`, default-constructing new elements.
    ///
    /// See [`resize_with`](Self::resize_with).
    pub fn resize(&mut self, new_len: usize) {
        self.resize_with(new_len, T::default);
    }
}
