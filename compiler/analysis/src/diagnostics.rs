//! Diagnostics collected during an analysis pass.

use std::fmt;

use ir::Position;

/// What kind of problem a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// More than one marker in a comment group
    MalformedAnnotation,
    /// A flag outside the vocabulary
    InvalidFlag,
    /// Mutually exclusive flags
    FlagConflict,
    /// A flag without the flags it depends on
    FlagDependency,
    /// A marker not attached to a type declaration
    MisplacedAnnotation,
    /// Handler name does not carry the required suffix
    NamingViolation,
    /// Underlying type could not be determined
    UnresolvedType,
    /// Underlying type is neither a func nor an interface
    UnsupportedShape,
    /// Interface without visible methods
    EmptyInterface,
    /// Embedded type is not an interface
    UnresolvableEmbedding,
}

impl DiagnosticKind {
    /// Get the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MalformedAnnotation => "malformed-annotation",
            DiagnosticKind::InvalidFlag => "invalid-flag",
            DiagnosticKind::FlagConflict => "flag-conflict",
            DiagnosticKind::FlagDependency => "flag-dependency",
            DiagnosticKind::MisplacedAnnotation => "misplaced-annotation",
            DiagnosticKind::NamingViolation => "naming-violation",
            DiagnosticKind::UnresolvedType => "unresolved-type",
            DiagnosticKind::UnsupportedShape => "unsupported-shape",
            DiagnosticKind::EmptyInterface => "empty-interface",
            DiagnosticKind::UnresolvableEmbedding => "unresolvable-embedding",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

/// A single problem found in the analyzed package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Kind of problem
    pub kind: DiagnosticKind,
    /// Where it was found
    pub position: Position,
    /// Human-readable message, without the position
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(kind: DiagnosticKind, position: Position, message: impl Into<String>) -> Self {
        Self { kind, position, message: message.into() }
    }
}

/// Formats as `position: message`.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

/// Diagnostics in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self { Self::default() }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        logging::trace("diagnostics", &format!("[{}] {}", diagnostic.kind, diagnostic));
        self.items.push(diagnostic);
    }

    /// Append all diagnostics of `other`.
    pub fn merge(&mut self, other: Diagnostics) { self.items.extend(other.items); }

    /// Whether nothing was reported.
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Number of diagnostics.
    pub fn len(&self) -> usize { self.items.len() }

    /// Diagnostics in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> { self.items.iter() }

    /// Number of diagnostics of `kind`.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    /// Take the diagnostics out of the collector.
    pub fn into_vec(self) -> Vec<Diagnostic> { self.items }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter { self.items.into_iter() }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter { self.items.iter() }
}
