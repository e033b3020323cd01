#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Go source generation for evon dispatchers.
//!
//! This crate turns an analyzed [`Model`] into the text of one Go source file.
//! It does no I/O: callers get `(file name, source)` pairs and decide where
//! they go.

use analysis::Model;
use thiserror::Error;

pub mod generators;
pub mod utils;

pub use generators::{DispatcherGenerator, HEADER, QUEUE_CAPACITY};

/// Error type for code generation operations in this crate.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Formatting error when building generated source.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
}

impl From<String> for CodegenError {
    fn from(msg: String) -> Self { CodegenError::Message(msg) }
}

/// Convenient result type for codegen functions in this crate.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Produces source files from an analyzed model.
///
/// Implementors return `(file name, source)` pairs. Rendering the same model
/// twice must give identical text.
pub trait CodeGenerator {
    /// Generate source files for `model`.
    fn generate(&self, model: &Model) -> Result<Vec<(String, String)>>;

    /// Optional validation step after generation (default is no-op).
    fn validate(&self, _model: &Model) -> Result<()> { Ok(()) }
}
