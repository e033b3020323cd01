#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Core types of the evon generator
//!
//! This crate defines the data model shared by analysis and code generation:
//! annotation flags and the dispatch policy they select, resolved event shapes
//! and their signatures, and the occurrence-based type text that import
//! finalization rewrites in place.

/// Annotation flags, flag sets and the policy they select.
pub mod flags;
/// Resolved event shapes and the records binding them to annotations.
pub mod shape;
/// Type text with rewritable identifier occurrences.
pub mod text;

pub use flags::{Annotation, DeliveryMode, Flag, FlagError, FlagSet, Policy};
pub use shape::{DeclarationRecord, EventShape, ParamGroup, ResultGroup, ShapeKind, Signature};
pub use text::{OccurrenceArena, OccurrenceId, Segment, TypeText};
