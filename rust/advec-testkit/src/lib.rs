//! Test utilities and helpers for the advec crates.
//!
//! This crate provides:
//! - [`tracked::Tracked`], an element type that records every construction and
//!   drop in a thread-local ledger and can be told to panic in `Default` or
//!   `Clone`
//! - [`counting_alloc::CountingAllocator`], a global allocator wrapper with
//!   per-thread allocation accounting
//! - [`ops`], random operation sequences for model-based testing
//!
//! # Usage
//!
//! This crate is intended for use within the advec test suites only.

pub mod counting_alloc;
pub mod ops;
pub mod tracked;
