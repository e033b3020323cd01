#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Evon analysis pass
//!
//! Scans the root package of a program graph for `@evon(...)` annotations,
//! binds them to handler type declarations, resolves every handler to its
//! event shape and prepares the [`Model`] the emitter renders. Problems are
//! collected across the whole package; any of them rejects the run.

use ir::Program;
use registry::DedupSet;
use thiserror::Error;
use types::DeclarationRecord;

pub mod binder;
pub mod diagnostics;
pub mod model;
pub mod scanner;

pub use binder::{Binder, Bound};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use model::{EventModel, MethodModel, Model, HELPER_IDENTS, SYNC_PATH};
pub use scanner::{AnnotationScanner, CommentCursor};

/// Handler and event naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    /// Required suffix of handler type names
    pub handler_suffix: String,
    /// Suffix of generated event type names
    pub event_suffix: String,
}

impl Default for Naming {
    fn default() -> Self { Self { handler_suffix: "Handler".into(), event_suffix: "Event".into() } }
}

impl Naming {
    /// Create a naming convention.
    pub fn new(handler_suffix: impl Into<String>, event_suffix: impl Into<String>) -> Self {
        Self { handler_suffix: handler_suffix.into(), event_suffix: event_suffix.into() }
    }

    /// Whether `name` ends with the handler suffix and is longer than it.
    pub fn is_handler_name(&self, name: &str) -> bool {
        name.ends_with(&self.handler_suffix) && name.len() > self.handler_suffix.len()
    }

    /// Event type name for a handler: the handler suffix replaced by the event suffix.
    pub fn event_name(&self, handler: &str) -> String {
        let base = handler.strip_suffix(self.handler_suffix.as_str()).unwrap_or(handler);
        format!("{}{}", base, self.event_suffix)
    }

    /// Name of the subscriber record type generated for `event`.
    pub fn sub_name(&self, event: &str) -> String { format!("evon{}Sub", event) }

    /// Every type name the generated file declares for `records`.
    pub fn generated_types(&self, records: &[DeclarationRecord]) -> Vec<String> {
        records
            .iter()
            .flat_map(|record| &record.events)
            .flat_map(|shape| {
                let event = self.event_name(&shape.name);
                [self.sub_name(&event), event]
            })
            .collect()
    }
}

/// Errors that stop an analysis pass.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The package has problems; every one of them is listed.
    #[error("{} problem(s) found", .0.len())]
    Rejected(Diagnostics),
    /// The root package is not part of the program.
    #[error("Root package `{0}` is not loaded")]
    MissingRoot(String),
    /// The marker pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

/// Result alias for analysis.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Analyze the root package of `program`.
pub fn analyze(program: &Program, naming: &Naming) -> Result<Model> {
    let root = program
        .root_package()
        .ok_or_else(|| AnalysisError::MissingRoot(program.root.clone()))?;
    let scanner = AnnotationScanner::new()?;

    let mut binder = Binder::new(program, naming, &scanner);
    for unit in &root.units {
        binder.bind_unit(unit);
    }
    let bound = binder.finish();

    if !bound.diagnostics.is_empty() {
        return Err(AnalysisError::Rejected(bound.diagnostics));
    }

    let (mut occurrences, mut imports) = bound.extractor.into_parts();
    if bound.need_sync {
        imports.require(SYNC_PATH, SYNC_PATH);
    }
    // Import aliases share the package block with the generated types.
    let taken = DedupSet::with_reserved(naming.generated_types(&bound.records));
    let imports = imports.finalize(&mut occurrences, taken);
    logging::trace(
        "analyze",
        &format!("{} declaration(s), {} import(s)", bound.records.len(), imports.entries().len()),
    );

    Ok(Model::build(root.name.clone(), bound.records, occurrences, imports, bound.need_sync, naming))
}
