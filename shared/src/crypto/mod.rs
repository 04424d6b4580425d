//! Content hashing helpers
//!
//! Digests here are identifiers, not security primitives.

pub mod hashing;

pub use hashing::*;
