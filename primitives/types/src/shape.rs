//! Event shapes.

use ir::Position;

use crate::flags::Annotation;
use crate::text::TypeText;

/// Whether a handler type resolved to a func or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A func type: one unnamed signature
    Func,
    /// An interface type: one signature per visible method
    Interface,
}

impl ShapeKind {
    /// One-letter tag used by the summary listing.
    pub fn tag(&self) -> &'static str {
        match self {
            ShapeKind::Func => "F",
            ShapeKind::Interface => "I",
        }
    }
}

/// A parameter group: zero or more names sharing one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamGroup {
    /// Names as declared; empty for an unnamed parameter
    pub names: Vec<String>,
    /// Type text; for a variadic group this is the element type
    pub ty: TypeText,
    /// Whether this is a trailing `...T` group
    pub variadic: bool,
}

/// A result group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGroup {
    /// Names as declared; empty for unnamed results
    pub names: Vec<String>,
    /// Type text
    pub ty: TypeText,
}

/// One callable signature of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Method name, empty for the func itself
    pub name: String,
    /// Parameter groups in order
    pub params: Vec<ParamGroup>,
    /// Result groups in order
    pub results: Vec<ResultGroup>,
}

impl Signature {
    /// Whether this signature is the func itself rather than a method.
    pub fn is_func(&self) -> bool { self.name.is_empty() }

    /// Whether the last parameter group is variadic.
    pub fn is_variadic(&self) -> bool { self.params.last().is_some_and(|p| p.variadic) }
}

/// A resolved handler type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventShape {
    /// Declared handler type name
    pub name: String,
    /// Position of the handler type name
    pub position: Position,
    /// Func or interface
    pub kind: ShapeKind,
    /// Signatures in flattening order
    pub signatures: Vec<Signature>,
}

/// An annotation and the shapes it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationRecord {
    /// The effective annotation
    pub annotation: Annotation,
    /// One shape per annotated spec; several only for a shared group annotation
    pub events: Vec<EventShape>,
}
