//! A contiguous, growable array with explicit control over storage and
//! element lifetimes.
//!
//! [`DynArray<T>`] keeps raw storage (an [`advec_raw::RawBuffer`]) apart from
//! the count of slots that hold live values. Every operation that needs more
//! room builds the new state in a fresh buffer first and commits it with a
//! constant-time swap, so a failing element constructor never leaves the
//! array half-updated.
//!
//! # Failure guarantees
//!
//! | Operation | On constructor panic / `Err` |
//! |---|---|
//! | `emplace_back`, `push`, `emplace`, `insert` (both paths) | array unchanged |
//! | `try_push`, `try_insert`, `try_emplace_back`, `try_emplace` | array unchanged, storage failure returned |
//! | `reserve`, `try_reserve` | array unchanged |
//! | `clone`, `with_len`, `from_fn` | nothing leaks |
//! | `clone_from` (copy into a smaller array) | `self` unchanged |
//! | `clone_from` (storage reused), growing `resize` | no leak, `len` counts live values |
//!
//! Moving an element in Rust is a bitwise copy that cannot fail, so elements
//! are always relocated, never cloned, when storage grows.
//!
//! # Growth
//!
//! Appending into a full array doubles its capacity (an empty array grows to
//! one slot). `reserve` and `resize` allocate exactly the capacity asked for.

pub mod dyn_array;
mod growth;
mod guard;
pub mod into_iter;
mod positional;

pub use advec_common::{Error, ErrorKind, Result};
pub use dyn_array::DynArray;
pub use into_iter::IntoIter;

#[cfg(test)]
mod tests;
