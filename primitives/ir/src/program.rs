//! Program graph structures
//!
//! A [`Program`] is a set of packages keyed by import path. Each package holds
//! its source units; each unit holds its ordered comment groups and top-level
//! declarations. Identifiers carry the type checker's binding information, so
//! cross-package references can be followed without re-running any analysis.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading or writing a program graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// I/O error while reading or writing the graph file
    #[error("Failed to access program graph: {0}")]
    Io(#[from] std::io::Error),
    /// The graph file is not valid JSON for this schema
    #[error("Failed to parse program graph: {0}")]
    Json(#[from] serde_json::Error),
    /// The root package is not part of the graph
    #[error("Root package `{0}` is missing from the program graph")]
    MissingRoot(String),
}

/// Result alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// The type-checked program: the package being generated for plus every
/// package reachable from it that the loader managed to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Import path of the package being generated for
    pub root: String,
    /// All loaded packages, the root included
    #[serde(default)]
    pub packages: Vec<Package>,
    /// Build tags the loader ran with
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Program {
    /// Create a program from its root path and packages.
    pub fn new(root: impl Into<String>, packages: Vec<Package>) -> Self {
        Self { root: root.into(), packages, tags: Vec::new() }
    }

    /// Parse a program graph from a JSON string and check that the root exists.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let program: Program = serde_json::from_str(json)?;
        if program.root_package().is_none() {
            return Err(GraphError::MissingRoot(program.root));
        }
        Ok(program)
    }

    /// Load a program graph from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Save this program graph as pretty-printed JSON.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The package being generated for.
    pub fn root_package(&self) -> Option<&Package> { self.package(&self.root) }

    /// Look up a loaded package by import path.
    pub fn package(&self, path: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.path == path)
    }

    /// The declared name of the package at `path`.
    ///
    /// Falls back to the last path element when the package was not loaded.
    pub fn package_name(&self, path: &str) -> String {
        match self.package(path) {
            Some(pkg) => pkg.name.clone(),
            None => path.rsplit('/').next().unwrap_or(path).to_string(),
        }
    }
}

/// A single loaded package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Import path (e.g. "github.com/acme/util")
    pub path: String,
    /// Declared package name (e.g. "util")
    pub name: String,
    /// Directory holding the package sources
    #[serde(default)]
    pub dir: PathBuf,
    /// Source units in load order
    #[serde(default)]
    pub units: Vec<SourceUnit>,
    /// Errors reported by the loader or type checker for this package
    #[serde(default)]
    pub errors: Vec<LoaderError>,
}

impl Package {
    /// Create a package with no errors and an empty directory.
    pub fn new(path: impl Into<String>, name: impl Into<String>, units: Vec<SourceUnit>) -> Self {
        Self { path: path.into(), name: name.into(), dir: PathBuf::new(), units, errors: vec![] }
    }

    /// All top-level type specs of the package with the unit that declares them.
    pub fn type_specs(&self) -> impl Iterator<Item = (&SourceUnit, &TypeSpec)> {
        self.units.iter().flat_map(|unit| {
            unit.decls.iter().flat_map(move |decl| {
                let specs: &[TypeSpec] = match decl {
                    Decl::Type(td) => &td.specs,
                    _ => &[],
                };
                specs.iter().map(move |spec| (unit, spec))
            })
        })
    }
}

/// An error reported by the loader, already formatted by it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoaderError {
    /// Position string as produced by the loader ("file:line:col"), may be empty
    #[serde(default)]
    pub pos: String,
    /// Error message
    pub message: String,
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pos.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.pos, self.message)
        }
    }
}

/// One source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceUnit {
    /// File path as reported in positions
    pub file: String,
    /// All comment groups of the file, in source order
    #[serde(default)]
    pub comments: Vec<CommentGroup>,
    /// Top-level declarations, in source order
    #[serde(default)]
    pub decls: Vec<Decl>,
}

impl SourceUnit {
    /// Attach this unit's file name to a position.
    pub fn position(&self, pos: Pos) -> Position {
        Position { file: self.file.clone(), line: pos.line, column: pos.column }
    }
}

/// Line and column inside a source unit, both 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// Line number
    pub line: u32,
    /// Column number, counted in bytes
    pub column: u32,
}

impl Pos {
    /// Create a position.
    pub fn new(line: u32, column: u32) -> Self { Self { line, column } }

    /// The position reached after `text` starting at `self`.
    pub fn advance(self, text: &str) -> Pos {
        let mut pos = self;
        for b in text.bytes() {
            if b == b'\n' {
                pos.line += 1;
                pos.column = 1;
            } else {
                pos.column += 1;
            }
        }
        pos
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A fully qualified position: file plus line and column.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// File path
    pub file: String,
    /// Line number
    pub line: u32,
    /// Column number
    pub column: u32,
}

impl Position {
    /// Line and column without the file name.
    pub fn short(&self) -> Pos { Pos::new(self.line, self.column) }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        }
    }
}

/// A run of adjacent comments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentGroup {
    /// Comments in source order
    pub comments: Vec<Comment>,
}

/// A single `//` or `/* */` comment, markers included in `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Position of the first character of the comment
    pub pos: Pos,
    /// Raw comment text
    pub text: String,
}

impl Comment {
    /// Position of the byte at `offset` inside this comment's text.
    pub fn pos_at(&self, offset: usize) -> Pos {
        let end = offset.min(self.text.len());
        self.pos.advance(&self.text[..end])
    }
}

/// A top-level declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "decl", rename_all = "snake_case")]
pub enum Decl {
    /// `type` declaration, single or grouped
    Type(TypeDecl),
    /// Function or method declaration
    Func(FuncDecl),
    /// `var` declaration
    Var(ValueDecl),
    /// `const` declaration
    Const(ValueDecl),
}

impl Decl {
    /// Index of the doc comment group attached to the declaration itself.
    pub fn doc(&self) -> Option<usize> {
        match self {
            Decl::Type(d) => d.doc,
            Decl::Func(d) => d.doc,
            Decl::Var(d) | Decl::Const(d) => d.doc,
        }
    }
}

/// A `type` declaration holding one or more specs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Doc comment of the whole declaration (index into the unit's comments)
    #[serde(default)]
    pub doc: Option<usize>,
    /// The specs in source order
    pub specs: Vec<TypeSpec>,
}

/// A single `Name [=] Type` spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSpec {
    /// Declared name
    pub name: Ident,
    /// Doc comment of this spec (index into the unit's comments)
    #[serde(default)]
    pub doc: Option<usize>,
    /// Whether the spec is an alias (`type A = B`) rather than a definition
    #[serde(default)]
    pub assign: bool,
    /// Right-hand type expression
    pub ty: TypeExpr,
}

/// A function declaration. Only its doc comment matters to the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDecl {
    /// Function name
    pub name: Ident,
    /// Doc comment (index into the unit's comments)
    #[serde(default)]
    pub doc: Option<usize>,
}

/// A `var` or `const` declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueDecl {
    /// Declared names
    #[serde(default)]
    pub names: Vec<Ident>,
    /// Doc comment (index into the unit's comments)
    #[serde(default)]
    pub doc: Option<usize>,
}

/// An identifier with the type checker's view of what it refers to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ident {
    /// Spelling in the source
    pub name: String,
    /// Position of the first character
    #[serde(default)]
    pub pos: Pos,
    /// What the identifier refers to; absent when type information is missing
    #[serde(default)]
    pub binding: Option<Binding>,
}

impl Ident {
    /// Create an identifier without binding information.
    pub fn new(name: impl Into<String>, pos: Pos) -> Self {
        Self { name: name.into(), pos, binding: None }
    }

    /// Create an identifier bound to `binding`.
    pub fn bound(name: impl Into<String>, pos: Pos, binding: Binding) -> Self {
        Self { name: name.into(), pos, binding: Some(binding) }
    }

    /// Whether the name is visible outside its package (starts with an upper-case letter).
    pub fn is_exported(&self) -> bool { is_exported(&self.name) }

    /// Whether the identifier is the blank identifier `_`.
    pub fn is_blank(&self) -> bool { self.name == "_" }
}

/// Whether `name` is visible outside its package.
pub fn is_exported(name: &str) -> bool { name.chars().next().is_some_and(char::is_uppercase) }

/// Type checker binding of an identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    /// The identifier names an imported package
    Package {
        /// Import path of the package
        path: String,
    },
    /// The identifier names a type declared at the top level of `package`
    Type {
        /// Import path of the owning package
        package: String,
    },
    /// The identifier names a predeclared type such as `int` or `error`
    Universe,
    /// The identifier names something that is not a type
    Value,
}

/// Channel direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    /// `chan T`
    #[default]
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// Type expressions, as a closed set of syntactic kinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    /// A bare identifier (`T`)
    Ident(Ident),
    /// A qualified identifier (`pkg.T`)
    Selector {
        /// Package name identifier
        package: Ident,
        /// Selected type identifier
        name: Ident,
    },
    /// A parenthesized type (`(T)`)
    Paren {
        /// Wrapped type
        inner: Box<TypeExpr>,
    },
    /// A function type
    Func(FuncType),
    /// An interface type
    Interface(InterfaceType),
    /// `*T`
    Pointer {
        /// Pointee type
        elem: Box<TypeExpr>,
    },
    /// `[]T`
    Slice {
        /// Element type
        elem: Box<TypeExpr>,
    },
    /// `[N]T`
    Array {
        /// Length expression as written
        len: String,
        /// Element type
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`
    Map {
        /// Key type
        key: Box<TypeExpr>,
        /// Value type
        value: Box<TypeExpr>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan {
        /// Direction
        #[serde(default)]
        dir: ChanDir,
        /// Element type
        elem: Box<TypeExpr>,
    },
    /// `...T`, only valid as the last parameter type
    Ellipsis {
        /// Element type
        elem: Box<TypeExpr>,
    },
    /// `struct { ... }`
    Struct {
        /// Fields in declaration order
        #[serde(default)]
        fields: Vec<Field>,
    },
    /// Instantiated generic type (`T[A, B]`)
    Generic {
        /// Generic type
        base: Box<TypeExpr>,
        /// Type arguments
        args: Vec<TypeExpr>,
    },
    /// Anything else, kept verbatim
    Other {
        /// Source text
        text: String,
    },
}

impl TypeExpr {
    /// Short description of the expression kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeExpr::Ident(_) => "identifier",
            TypeExpr::Selector { .. } => "qualified identifier",
            TypeExpr::Paren { .. } => "parenthesized type",
            TypeExpr::Func(_) => "func type",
            TypeExpr::Interface(_) => "interface type",
            TypeExpr::Pointer { .. } => "pointer type",
            TypeExpr::Slice { .. } => "slice type",
            TypeExpr::Array { .. } => "array type",
            TypeExpr::Map { .. } => "map type",
            TypeExpr::Chan { .. } => "channel type",
            TypeExpr::Ellipsis { .. } => "variadic type",
            TypeExpr::Struct { .. } => "struct type",
            TypeExpr::Generic { .. } => "generic instantiation",
            TypeExpr::Other { .. } => "type",
        }
    }
}

/// Parameters and results of a function type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FuncType {
    /// Parameter groups
    #[serde(default)]
    pub params: Vec<Field>,
    /// Result groups
    #[serde(default)]
    pub results: Vec<Field>,
}

impl FuncType {
    /// Whether the last parameter group is variadic.
    pub fn is_variadic(&self) -> bool {
        matches!(self.params.last(), Some(Field { ty: TypeExpr::Ellipsis { .. }, .. }))
    }
}

/// A group of names sharing one type (`a, b int`), or an unnamed entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Field {
    /// Names of the group; empty for unnamed parameters and results
    #[serde(default)]
    pub names: Vec<Ident>,
    /// Shared type
    pub ty: TypeExpr,
}

/// The entries of an interface type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceType {
    /// Methods and embeddings in declaration order
    #[serde(default)]
    pub methods: Vec<InterfaceEntry>,
}

/// One interface entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum InterfaceEntry {
    /// A named method
    Method {
        /// Method name
        name: Ident,
        /// Method signature
        sig: FuncType,
    },
    /// An embedded type
    Embedded {
        /// Embedded type expression
        ty: TypeExpr,
    },
}
