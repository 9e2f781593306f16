pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Unwraps the result of a storage request, diverging through
/// [`Error::raise`](crate::error::Error::raise) on failure.
///
/// This is how the infallible operations are layered on top of their
/// `try_*` counterparts.
#[inline]
pub fn unwrap_storage<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => e.raise(),
    }
}
