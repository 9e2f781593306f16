use std::alloc::Layout;

use thiserror::Error;

/// Error returned by the fallible (`try_*`) storage operations.
///
/// The kind is stored inline rather than boxed: these errors are produced on
/// out-of-memory paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    pub fn into_kind(self) -> ErrorKind {
        self.0
    }

    /// The allocator could not satisfy a request described by `layout`.
    pub fn alloc_failed(layout: Layout) -> Error {
        Error(ErrorKind::AllocFailed {
            size: layout.size(),
            align: layout.align(),
        })
    }

    /// `requested` elements do not fit into a valid allocation layout.
    pub fn capacity_overflow(requested: usize) -> Error {
        Error(ErrorKind::CapacityOverflow { requested })
    }

    /// Returns `true` if this is an allocator failure rather than a size overflow.
    pub fn is_alloc_failure(&self) -> bool {
        matches!(self.0, ErrorKind::AllocFailed { .. })
    }

    /// Diverges the way the infallible storage operations do: capacity overflow
    /// panics, allocator failure goes through [`std::alloc::handle_alloc_error`].
    #[cold]
    pub fn raise(self) -> ! {
        match self.0 {
            ErrorKind::CapacityOverflow { .. } => panic!("capacity overflow"),
            ErrorKind::AllocFailed { size, align } => match Layout::from_size_align(size, align) {
                Ok(layout) => std::alloc::handle_alloc_error(layout),
                Err(_) => panic!("capacity overflow"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("capacity overflow: {requested} elements exceed the addressable range")]
    CapacityOverflow { requested: usize },

    #[error("memory allocation of {size} bytes (align {align}) failed")]
    AllocFailed { size: usize, align: usize },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind)
    }
}
