#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Evon program graph
//!
//! This crate defines the read-only, already type-checked view of a program that
//! the generator consumes. An external loader parses and type-checks the target
//! package and its dependencies, then serializes the result in this shape. The
//! generator never parses source text itself.

pub mod program;
#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-export the program graph types for convenience
pub use program::*;
