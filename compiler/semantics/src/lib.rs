#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Semantic analysis of handler types.
//!
//! Resolves annotated type declarations through aliases, redefinitions and
//! package boundaries to the func or interface literal they stand for, flattens
//! interface embeddings, and extracts the resulting event shapes together with
//! the foreign references their signatures make.

/// Shape extraction and type printing
pub mod extract;
/// Interface flattening
pub mod flatten;
/// Type reference resolution
pub mod resolver;

pub use extract::ShapeExtractor;
pub use flatten::{FlatMethod, Flattener};
pub use resolver::{error_interface, DeclKey, Resolved, Terminal, TypeResolver, UNIVERSE};

/// Errors that can occur while resolving a handler type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    /// A reference could not be followed, usually because of missing type information.
    #[error("Cannot resolve type \"{0}\"")]
    Unresolved(String),
    /// Following references led back to a declaration already being resolved.
    #[error("Type \"{0}\" refers to itself")]
    Cycle(String),
    /// An embedded type resolved to something other than an interface.
    #[error("Embedded type \"{name}\" is a {kind}, not an interface")]
    NotInterface {
        /// Embedded type as written
        name: String,
        /// Kind of its terminal literal
        kind: &'static str,
    },
    /// The handler type is neither a func nor an interface.
    #[error("Type \"{name}\" is a {kind}, not a func or interface")]
    Unsupported {
        /// Handler type name
        name: String,
        /// Kind of its terminal literal
        kind: &'static str,
    },
    /// Flattening left no visible methods.
    #[error("Interface type \"{0}\" has no usable methods")]
    EmptyInterface(String),
}

/// Result type for semantic analysis operations.
pub type Result<T> = std::result::Result<T, SemanticError>;
