//! `MemoryOwner`: A trait for types that exclusively own a block of storage.

/// A trait for types that exclusively own a contiguous block of storage.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - The pointer returned by `memory()` stays valid until the owner is mutated
///   or dropped.
/// - Memory is exclusively owned by the `MemoryOwner` instance,
///   with no shared ownership of the underlying block.
/// - `ptr` is aligned to at least `alignment`.
/// - The reported length and capacity are accurate and `len <= capacity`.
pub unsafe trait MemoryOwner {
    /// Returns information about the owned memory block.
    fn memory(&self) -> MemoryAllocation;
}

/// Represents a block of allocated memory with its size information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryAllocation {
    /// Pointer to the start of the block. Dangling (but aligned) when the
    /// capacity is zero.
    pub ptr: *const u8,
    /// Bytes at the start of the block that currently hold live values.
    pub len: usize,
    /// Total capacity of the block in bytes.
    pub capacity: usize,
    /// Formal alignment of the memory block.
    pub alignment: usize,
}

impl MemoryAllocation {
    /// Bytes of the block that are allocated but hold no live values.
    pub fn spare(&self) -> usize {
        self.capacity - self.len
    }
}
