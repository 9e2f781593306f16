//! Raw, uninitialized storage for the advec containers.
//!
//! [`RawBuffer<T>`](raw_buffer::RawBuffer) owns a block of memory sized for a
//! fixed number of `T` slots and nothing else: it never constructs or drops a
//! `T`. Tracking which slots hold live values is the job of the container
//! that owns the buffer.

pub mod alloc;
pub mod raw_buffer;

pub use raw_buffer::RawBuffer;
