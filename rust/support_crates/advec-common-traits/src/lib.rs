//! Traits and definitions shared across the advec crates.
//!
//! # Modules
//!
//! - [`memory_owner`]: Traits for containers that exclusively own a block of
//!   typed storage and can describe it in bytes

pub mod memory_owner;
