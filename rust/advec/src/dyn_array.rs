//! The [`DynArray`] type: construction, assignment, access and trait impls.
//!
//! Growth and tail operations live in `growth.rs`, positional insert and
//! erase in `positional.rs`.

use std::borrow::{Borrow, BorrowMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};
use std::ptr;

use advec_common::{Result, result::unwrap_storage};
use advec_common_traits::memory_owner::{MemoryAllocation, MemoryOwner};
use advec_raw::RawBuffer;

use crate::guard::{PartialInit, SetLenOnDrop};

/// A contiguous, growable array of `T`.
///
/// The first [`len`](Self::len) slots of the owned buffer hold live values;
/// the remaining `capacity - len` slots are uninitialized storage.
///
/// # Examples
///
/// ```
/// use advec::DynArray;
///
/// let mut a = DynArray::new();
/// for i in 0..5 {
///     a.push(i);
/// }
/// a.insert(2, 99);
/// assert_eq!(a, [0, 1, 99, 2, 3, 4]);
///
/// a.erase(0);
/// a.resize(2);
/// assert_eq!(a, [1, 99]);
/// assert_eq!(a.capacity(), 8);
/// ```
pub struct DynArray<T> {
    /// Storage; slots `[0, len)` are live.
    pub(crate) buf: RawBuffer<T>,
    pub(crate) len: usize,
}

impl<T> DynArray<T> {
    /// Capacity an empty array grows to on its first append.
    pub const MIN_GROWTH_CAPACITY: usize = 1;
    /// Capacity multiplier applied when appending into a full array.
    pub const GROWTH_FACTOR: usize = 2;

    /// Creates an empty array. Does not allocate.
    pub const fn new() -> DynArray<T> {
        DynArray {
            buf: RawBuffer::new(),
            len: 0,
        }
    }

    /// Creates an empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> DynArray<T> {
        unwrap_storage(Self::try_with_capacity(capacity))
    }

    pub fn try_with_capacity(capacity: usize) -> Result<DynArray<T>> {
        Ok(DynArray {
            buf: RawBuffer::try_with_capacity(capacity)?,
            len: 0,
        })
    }

    /// Creates an array of `len` elements, the `i`-th built by `f(i)`.
    ///
    /// Capacity is exactly `len`. If `f` panics, the elements built so far are
    /// dropped and the storage is released before the panic propagates.
    pub fn from_fn(len: usize, f: impl FnMut(usize) -> T) -> DynArray<T> {
        unwrap_storage(Self::try_build(len, f))
    }

    pub(crate) fn try_build(len: usize, mut f: impl FnMut(usize) -> T) -> Result<DynArray<T>> {
        let mut buf = RawBuffer::<T>::try_with_capacity(len)?;
        // SAFETY: `buf` has `len` fresh slots and outlives the guard.
        let mut init = unsafe { PartialInit::new(buf.as_mut_ptr()) };
        for i in 0..len {
            let value = f(i);
            unsafe { init.push(value) };
        }
        let len = init.finish();
        Ok(DynArray { buf, len })
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the array can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of uninitialized slots after the last element.
    #[inline]
    pub fn spare_capacity(&self) -> usize {
        self.buf.capacity() - self.len
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are live; the pointer is non-null and
        // aligned even for the empty sentinel.
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: see `as_slice`.
        unsafe { std::slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// Exchanges contents (storage and length) with `other` in constant time.
    #[inline]
    pub fn swap(&mut self, other: &mut DynArray<T>) {
        self.buf.swap(&mut other.buf);
        std::mem::swap(&mut self.len, &mut other.len);
    }

    /// Moves the whole contents out in constant time, leaving `self` empty
    /// with zero capacity.
    #[inline]
    pub fn take(&mut self) -> DynArray<T> {
        std::mem::take(self)
    }

    /// Replaces the contents of `self` with those of `other`, which is left
    /// empty with zero capacity. The previous elements of `self` are dropped.
    pub fn move_from(&mut self, other: &mut DynArray<T>) {
        *self = other.take();
    }

    /// Appends `count` values built by `f(0)..f(count)` into spare capacity.
    ///
    /// Each value counts towards `len` as soon as it is written.
    pub(crate) fn fill_spare_with(&mut self, count: usize, mut f: impl FnMut(usize) -> T) {
        assert!(count <= self.spare_capacity());
        let ptr = self.buf.as_mut_ptr();
        let mut len = SetLenOnDrop::new(&mut self.len);
        for i in 0..count {
            let value = f(i);
            // SAFETY: `len + count <= capacity`, checked above.
            unsafe { ptr.add(len.current()).write(value) };
            len.increment();
        }
    }
}

impl<T: Default> DynArray<T> {
    /// Creates an array of `len` default-constructed elements; capacity is
    /// exactly `len`.
    pub fn with_len(len: usize) -> DynArray<T> {
        Self::from_fn(len, |_| T::default())
    }

    pub fn try_with_len(len: usize) -> Result<DynArray<T>> {
        Self::try_build(len, |_| T::default())
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // SAFETY: the first `len` slots are live; the buffer field releases
        // the storage afterwards.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        DynArray::new()
    }
}

impl<T: Clone> Clone for DynArray<T> {
    /// Clones into storage sized for exactly `self.len()` elements.
    fn clone(&self) -> Self {
        let src = self.as_slice();
        DynArray::from_fn(src.len(), |i| src[i].clone())
    }

    /// Copy assignment.
    ///
    /// When `source` does not fit into the current capacity, a full clone is
    /// built first and then replaces `self`, so a panicking `clone` leaves
    /// `self` untouched. Otherwise the storage is reused: the common prefix is
    /// assigned element by element, missing elements are cloned in and
    /// surplus ones dropped.
    fn clone_from(&mut self, source: &Self) {
        if self.capacity() < source.len() {
            *self = source.clone();
            return;
        }

        let common = self.len.min(source.len);
        self.as_mut_slice()[..common].clone_from_slice(&source[..common]);
        if source.len > self.len {
            let tail = &source[self.len..];
            self.fill_spare_with(tail.len(), |i| tail[i].clone());
        } else {
            self.truncate(source.len);
        }
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Borrow<[T]> for DynArray<T> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> BorrowMut<[T]> for DynArray<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq<U>, U> PartialEq<DynArray<U>> for DynArray<T> {
    fn eq(&self, other: &DynArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for DynArray<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for DynArray<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for DynArray<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash> Hash for DynArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = DynArray::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if lower > self.spare_capacity() {
            let needed = self.len.saturating_add(lower);
            self.reserve(needed.max(self.grown_capacity()));
        }
        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T: Clone> From<&[T]> for DynArray<T> {
    fn from(slice: &[T]) -> Self {
        DynArray::from_fn(slice.len(), |i| slice[i].clone())
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    fn from(values: [T; N]) -> Self {
        let mut array = DynArray::with_capacity(N);
        array.extend(values);
        array
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

unsafe impl<T> MemoryOwner for DynArray<T> {
    fn memory(&self) -> MemoryAllocation {
        MemoryAllocation {
            ptr: self.buf.as_ptr().cast(),
            len: self.len * size_of::<T>(),
            capacity: self.buf.capacity() * size_of::<T>(),
            alignment: align_of::<T>(),
        }
    }
}
