//! Core definitions (error types and the result alias), relied upon by all advec-* crates.

pub mod error;
pub mod result;

pub use error::{Error, ErrorKind};
pub use result::Result;
